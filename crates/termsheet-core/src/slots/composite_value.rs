//! Composite value: a fixed amount, the greater of an amount and a share of a
//! metric, or one of two "not applicable" markers.

use serde_json::{Map, Value};

use crate::error::SlotError;
use crate::payload::PayloadReader;
use crate::slot::{impl_slot_serde, Slot};

/// "Greater of [amount] and [percentage]% of [metric]".
#[derive(Debug, Clone, PartialEq)]
pub struct GreaterOf {
    /// The fixed amount.
    pub amount: f64,
    /// Percentage applied to the metric, e.g. `5.0` for 5%.
    pub percentage: f64,
    /// The metric the percentage applies to, e.g. `EBITDA`.
    pub metric: String,
}

impl GreaterOf {
    fn read(reader: &PayloadReader<'_>) -> Result<Self, SlotError> {
        Ok(Self {
            amount: reader.float("amount")?,
            percentage: reader.float("percentage")?,
            metric: reader.string("metric")?,
        })
    }

    fn to_value(&self) -> Value {
        let mut details = Map::new();
        details.insert("amount".into(), Value::from(self.amount));
        details.insert("percentage".into(), Value::from(self.percentage));
        details.insert("metric".into(), Value::from(self.metric.clone()));
        Value::Object(details)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompositeValue {
    /// A plain number.
    Number { value: f64 },
    /// The greater of a fixed amount and a percentage of a metric.
    GreaterOf(GreaterOf),
    /// No minimum cash balance requirement.
    NoMinimum,
    /// No PIK toggle applies.
    NoPik,
}

impl Slot for CompositeValue {
    const NAME: &'static str = "composite_value";
    const TAGS: &'static [&'static str] = &["number", "greater_of", "no_minimum", "no_pik"];
    const TAG_COLUMN_LEN: usize = 20;

    fn tag(&self) -> &'static str {
        match self {
            Self::Number { .. } => "number",
            Self::GreaterOf(_) => "greater_of",
            Self::NoMinimum => "no_minimum",
            Self::NoPik => "no_pik",
        }
    }

    fn parse(tag: &str, fields: &Map<String, Value>) -> Result<Self, SlotError> {
        let reader = PayloadReader::new(Self::NAME, tag, fields);
        match tag {
            "number" => Ok(Self::Number {
                value: reader.float("value")?,
            }),
            "greater_of" => Ok(Self::GreaterOf(GreaterOf::read(
                &reader.object("details")?,
            )?)),
            "no_minimum" => Ok(Self::NoMinimum),
            "no_pik" => Ok(Self::NoPik),
            other => Err(Self::unknown_variant(other)),
        }
    }

    fn payload(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        match self {
            Self::Number { value } => {
                fields.insert("value".into(), Value::from(*value));
            }
            Self::GreaterOf(details) => {
                fields.insert("details".into(), details.to_value());
            }
            Self::NoMinimum | Self::NoPik => {}
        }
        fields
    }
}

impl_slot_serde!(CompositeValue);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ingest_number() {
        let slot = CompositeValue::ingest(&json!({"type": "number", "value": 1000000})).unwrap();
        assert_eq!(slot, CompositeValue::Number { value: 1_000_000.0 });
        assert_eq!(slot.to_stored().payload, json!({"value": 1000000.0}));
    }

    #[test]
    fn ingest_greater_of() {
        let slot = CompositeValue::ingest(&json!({
            "type": "greater_of",
            "details": {"amount": 1000000, "percentage": 5.0, "metric": "EBITDA"}
        }))
        .unwrap();
        assert_eq!(
            slot,
            CompositeValue::GreaterOf(GreaterOf {
                amount: 1_000_000.0,
                percentage: 5.0,
                metric: "EBITDA".to_string(),
            })
        );
        let stored = slot.to_stored();
        assert_eq!(stored.tag, "greater_of");
        assert_eq!(
            stored.payload,
            json!({"details": {"amount": 1000000.0, "percentage": 5.0, "metric": "EBITDA"}})
        );
    }

    #[test]
    fn number_without_value_is_missing_field() {
        let err = CompositeValue::ingest(&json!({"type": "number"})).unwrap_err();
        assert_eq!(
            err,
            SlotError::MissingField {
                slot: "composite_value",
                tag: "number".to_string(),
                field: "value".to_string(),
                expected: "number",
            }
        );
    }

    #[test]
    fn greater_of_with_partial_details_is_missing_field() {
        let err = CompositeValue::ingest(&json!({
            "type": "greater_of",
            "details": {"amount": 1.0, "metric": "EBITDA"}
        }))
        .unwrap_err();
        match err {
            SlotError::MissingField { field, .. } => assert_eq!(field, "details.percentage"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_is_unknown_variant() {
        let err = CompositeValue::ingest(&json!({"type": "invalid_type", "value": 1})).unwrap_err();
        assert!(matches!(
            err,
            SlotError::UnknownVariant { ref tag, .. } if tag == "invalid_type"
        ));
    }

    #[test]
    fn markers_project_to_tag_only() {
        assert_eq!(
            CompositeValue::NoMinimum.project(),
            json!({"type": "no_minimum"})
        );
        assert_eq!(CompositeValue::NoPik.project(), json!({"type": "no_pik"}));
        assert!(CompositeValue::NoPik.is_marker());
        assert!(!CompositeValue::Number { value: 0.0 }.is_marker());
    }

    #[test]
    fn tags_fit_column() {
        for tag in CompositeValue::TAGS {
            assert!(tag.len() <= CompositeValue::TAG_COLUMN_LEN);
        }
    }
}
