//! # Term Sheet Fields
//!
//! The user-editable part of a record: four optional scalars and five
//! optional slots. Both create and update take a full [`TermSheetFields`];
//! there is no partial merge, so an omitted slot clears the stored one.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::slot::Slot;
use crate::slots::{
    CompositeValue, FinancialRatio, NamesList, PercentageCondition, PercentageMultiple,
};
use crate::status::TermSheetStatus;

/// Validated contents of a term sheet record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TermSheetFields {
    pub boolean_value: Option<bool>,
    pub term_sheet_status: Option<TermSheetStatus>,
    pub numeric_value: Option<f64>,
    pub date_value: Option<NaiveDate>,
    pub composite_value: Option<CompositeValue>,
    pub percentage_multiple: Option<PercentageMultiple>,
    pub names_list: Option<NamesList>,
    pub financial_ratio: Option<FinancialRatio>,
    pub percentage_condition: Option<PercentageCondition>,
}

impl TermSheetFields {
    /// Validate a record body.
    ///
    /// Missing keys and explicit `null`s both leave the attribute unset.
    /// Keys outside the record's attributes (including the read-only `id`,
    /// `created_at`, `updated_at`) are ignored.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let object = body.as_object().ok_or(ValidationError::BodyNotAnObject)?;
        Ok(Self {
            boolean_value: scalar(object, "boolean_value")?,
            term_sheet_status: scalar(object, "term_sheet_status")?,
            numeric_value: scalar(object, "numeric_value")?,
            date_value: scalar(object, "date_value")?,
            composite_value: slot(object)?,
            percentage_multiple: slot(object)?,
            names_list: slot(object)?,
            financial_ratio: slot(object)?,
            percentage_condition: slot(object)?,
        })
    }
}

fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn scalar<T: DeserializeOwned>(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<T>, ValidationError> {
    present(object, field)
        .map(|value| {
            T::deserialize(value).map_err(|e| ValidationError::InvalidScalar {
                field,
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn slot<S: Slot>(object: &Map<String, Value>) -> Result<Option<S>, ValidationError> {
    Ok(present(object, S::NAME).map(S::ingest).transpose()?)
}
