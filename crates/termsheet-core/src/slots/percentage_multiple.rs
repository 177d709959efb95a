//! Percentage multiple: a percentage, or a statement that no cash
//! consideration is required or that the term sheet is silent.

use serde_json::{Map, Value};

use crate::error::SlotError;
use crate::payload::PayloadReader;
use crate::slot::{impl_slot_serde, Slot};

#[derive(Debug, Clone, PartialEq)]
pub enum PercentageMultiple {
    /// Percentage multiple, e.g. `5.0` for 5%.
    Percentage { value: f64 },
    /// No cash consideration requirement.
    NoCashRequirement,
    /// Not stated in the term sheet.
    NotStated,
}

impl Slot for PercentageMultiple {
    const NAME: &'static str = "percentage_multiple";
    const TAGS: &'static [&'static str] = &["percentage", "no_cash_requirement", "not_stated"];
    const TAG_COLUMN_LEN: usize = 30;

    fn tag(&self) -> &'static str {
        match self {
            Self::Percentage { .. } => "percentage",
            Self::NoCashRequirement => "no_cash_requirement",
            Self::NotStated => "not_stated",
        }
    }

    fn parse(tag: &str, fields: &Map<String, Value>) -> Result<Self, SlotError> {
        let reader = PayloadReader::new(Self::NAME, tag, fields);
        match tag {
            "percentage" => Ok(Self::Percentage {
                value: reader.float("value")?,
            }),
            "no_cash_requirement" => Ok(Self::NoCashRequirement),
            "not_stated" => Ok(Self::NotStated),
            other => Err(Self::unknown_variant(other)),
        }
    }

    fn payload(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Self::Percentage { value } = self {
            fields.insert("value".into(), Value::from(*value));
        }
        fields
    }
}

impl_slot_serde!(PercentageMultiple);
