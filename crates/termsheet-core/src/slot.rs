//! # Slot Trait: Ingest and Projection
//!
//! A slot is a closed set of tagged variants. Implementors provide the two
//! primitive directions:
//!
//! - [`Slot::parse`]: `(tag, fields) → variant`, rejecting unknown tags and
//!   missing or mistyped fields;
//! - [`Slot::payload`]: `variant → fields`, exactly the fields the tag defines.
//!
//! Everything else (wire ingest, the stored `(tag, payload)` pair, wire
//! projection, serde) is derived from those two here.

use serde_json::{Map, Value};

use crate::error::SlotError;

/// Wire key carrying the variant tag.
pub const TAG_KEY: &str = "type";

/// A slot in its stored form: the tag column and the JSONB payload column.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSlot {
    pub tag: String,
    pub payload: Value,
}

/// A tagged composite field of a term sheet record.
pub trait Slot: Sized {
    /// Field name of the slot on the record, e.g. `composite_value`.
    const NAME: &'static str;

    /// Every tag the slot accepts, in declaration order.
    const TAGS: &'static [&'static str];

    /// Maximum length of the stored tag column.
    const TAG_COLUMN_LEN: usize;

    /// The variant's tag.
    fn tag(&self) -> &'static str;

    /// Build a variant from its tag and fields.
    fn parse(tag: &str, fields: &Map<String, Value>) -> Result<Self, SlotError>;

    /// Exactly the fields the variant's tag defines. Empty for markers.
    fn payload(&self) -> Map<String, Value>;

    /// Whether the variant carries no fields beyond its tag.
    fn is_marker(&self) -> bool {
        self.payload().is_empty()
    }

    /// Ingest a wire object `{type, ...fields}`.
    ///
    /// Keys the tag does not define are ignored.
    fn ingest(value: &Value) -> Result<Self, SlotError> {
        let fields = value
            .as_object()
            .ok_or(SlotError::NotAnObject { slot: Self::NAME })?;
        let tag = fields
            .get(TAG_KEY)
            .and_then(Value::as_str)
            .ok_or(SlotError::MissingTag { slot: Self::NAME })?;
        Self::parse(tag, fields)
    }

    /// Project the variant to its wire object `{type, ...fields}`.
    fn project(&self) -> Value {
        let mut object = Map::new();
        object.insert(TAG_KEY.to_string(), Value::String(self.tag().to_string()));
        object.extend(self.payload());
        Value::Object(object)
    }

    /// Split the variant into its stored `(tag, payload)` pair.
    fn to_stored(&self) -> StoredSlot {
        StoredSlot {
            tag: self.tag().to_string(),
            payload: Value::Object(self.payload()),
        }
    }

    /// Rebuild a variant from a stored tag and payload.
    ///
    /// A missing or `null` payload is read as empty, which is valid only for
    /// marker variants.
    fn from_stored(tag: &str, payload: Option<&Value>) -> Result<Self, SlotError> {
        let empty = Map::new();
        let fields = match payload {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(fields)) => fields,
            Some(_) => return Err(SlotError::NotAnObject { slot: Self::NAME }),
        };
        Self::parse(tag, fields)
    }

    /// The error for a tag outside [`Slot::TAGS`].
    fn unknown_variant(tag: &str) -> SlotError {
        SlotError::UnknownVariant {
            slot: Self::NAME,
            tag: tag.to_string(),
            expected: Self::TAGS,
        }
    }
}

/// Stored columns for an optional slot: both `None` when the slot is unset.
pub fn store_optional<S: Slot>(slot: Option<&S>) -> (Option<String>, Option<Value>) {
    match slot.map(S::to_stored) {
        Some(StoredSlot { tag, payload }) => (Some(tag), Some(payload)),
        None => (None, None),
    }
}

/// Rebuild an optional slot from its stored columns.
///
/// A `NULL` tag means the slot was never set; the payload is then ignored.
pub fn project_optional<S: Slot>(
    tag: Option<&str>,
    payload: Option<&Value>,
) -> Result<Option<S>, SlotError> {
    tag.map(|tag| S::from_stored(tag, payload)).transpose()
}

/// Implement `Serialize`/`Deserialize` for a slot through its wire form.
macro_rules! impl_slot_serde {
    ($ty:ident) => {
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serde::Serialize::serialize(&$crate::slot::Slot::project(self), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::slot::Slot>::ingest(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_slot_serde;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::{CompositeValue, NamesList};
    use serde_json::json;

    #[test]
    fn ingest_requires_object() {
        assert_eq!(
            CompositeValue::ingest(&json!("number")),
            Err(SlotError::NotAnObject {
                slot: "composite_value"
            })
        );
    }

    #[test]
    fn ingest_requires_string_tag() {
        assert_eq!(
            CompositeValue::ingest(&json!({"value": 5.0})),
            Err(SlotError::MissingTag {
                slot: "composite_value"
            })
        );
        assert_eq!(
            CompositeValue::ingest(&json!({"type": 3, "value": 5.0})),
            Err(SlotError::MissingTag {
                slot: "composite_value"
            })
        );
    }

    #[test]
    fn from_stored_treats_null_payload_as_empty() {
        let marker = NamesList::from_stored("na", Some(&Value::Null)).unwrap();
        assert_eq!(marker, NamesList::NotApplicable);
        let marker = NamesList::from_stored("na", None).unwrap();
        assert_eq!(marker, NamesList::NotApplicable);
    }

    #[test]
    fn from_stored_rejects_non_object_payload() {
        assert_eq!(
            NamesList::from_stored("names_list", Some(&json!(["a"]))),
            Err(SlotError::NotAnObject { slot: "names_list" })
        );
    }

    #[test]
    fn from_stored_rejects_data_variant_without_payload() {
        assert!(matches!(
            CompositeValue::from_stored("number", None),
            Err(SlotError::MissingField { .. })
        ));
    }

    #[test]
    fn store_optional_unset_clears_both_columns() {
        assert_eq!(store_optional::<CompositeValue>(None), (None, None));
    }

    #[test]
    fn store_optional_marker_keeps_empty_payload() {
        let (tag, payload) = store_optional(Some(&CompositeValue::NoPik));
        assert_eq!(tag.as_deref(), Some("no_pik"));
        assert_eq!(payload, Some(json!({})));
    }

    #[test]
    fn project_optional_null_tag_is_absent() {
        let slot: Option<CompositeValue> =
            project_optional(None, Some(&json!({"value": 1.0}))).unwrap();
        assert!(slot.is_none());
    }

    #[test]
    fn project_optional_rebuilds_variant() {
        let slot: Option<CompositeValue> =
            project_optional(Some("number"), Some(&json!({"value": 1.0}))).unwrap();
        assert_eq!(slot, Some(CompositeValue::Number { value: 1.0 }));
    }

    #[test]
    fn project_optional_surfaces_corrupt_tags() {
        let err = project_optional::<CompositeValue>(Some("bogus"), None).unwrap_err();
        assert!(matches!(err, SlotError::UnknownVariant { .. }));
    }
}
