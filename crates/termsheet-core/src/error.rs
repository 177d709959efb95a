//! # Error Types
//!
//! Validation failures raised while ingesting a wire record or projecting a
//! stored one. All errors use `thiserror` for `Display` and `Error`.

use thiserror::Error;

/// A slot value could not be turned into one of the slot's variants.
///
/// Raised identically on ingest (wire object) and projection (stored tag and
/// payload), since both directions share [`crate::Slot::parse`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// The tag is not a member of the slot's variant set.
    #[error("{slot}: unknown variant `{tag}`, expected one of: {}", .expected.join(", "))]
    UnknownVariant {
        /// Slot name, e.g. `composite_value`.
        slot: &'static str,
        /// The rejected tag.
        tag: String,
        /// Every tag the slot accepts.
        expected: &'static [&'static str],
    },

    /// The slot object has no string `type` discriminator.
    #[error("{slot}: missing `type` discriminator")]
    MissingTag {
        /// Slot name.
        slot: &'static str,
    },

    /// The slot value (or its stored payload) is not a JSON object.
    #[error("{slot}: expected an object")]
    NotAnObject {
        /// Slot name.
        slot: &'static str,
    },

    /// A field required by the tag is absent, has the wrong type, or is a
    /// malformed nested object.
    #[error("{slot}: variant `{tag}` requires field `{field}` ({expected})")]
    MissingField {
        /// Slot name.
        slot: &'static str,
        /// Tag whose requirements were not met.
        tag: String,
        /// Dotted path of the offending field, e.g. `details.amount`.
        field: String,
        /// Expected JSON type of the field.
        expected: &'static str,
    },
}

impl SlotError {
    /// Name of the slot the error was raised for.
    pub fn slot(&self) -> &'static str {
        match self {
            Self::UnknownVariant { slot, .. }
            | Self::MissingTag { slot }
            | Self::NotAnObject { slot }
            | Self::MissingField { slot, .. } => slot,
        }
    }
}

/// A full record body failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The request body is not a JSON object.
    #[error("record body must be a JSON object")]
    BodyNotAnObject,

    /// A scalar attribute has the wrong type or an out-of-set value.
    #[error("{field}: {reason}")]
    InvalidScalar {
        /// Attribute name, e.g. `term_sheet_status`.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// One of the composite slots was rejected.
    #[error(transparent)]
    Slot(#[from] SlotError),
}
