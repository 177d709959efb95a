//! Term sheet record persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `financial_data` table.
//! Each slot maps onto a `<slot>_type` tag column and a `<slot>_data` JSONB
//! payload column; both are NULL when the slot is unset.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::PgPool;
use termsheet_core::{project_optional, store_optional, Slot, TermSheetStatus};

use crate::state::TermSheetRecord;

const COLUMNS: &str = "id, boolean_value, term_sheet_status, numeric_value, date_value,
     composite_value_type, composite_value_data,
     percentage_multiple_type, percentage_multiple_data,
     names_list_type, names_list_data,
     financial_ratio_type, financial_ratio_data,
     percentage_condition_type, percentage_condition_data,
     created_at, updated_at";

/// Insert a new record.
pub async fn insert(pool: &PgPool, record: &TermSheetRecord) -> Result<(), sqlx::Error> {
    let row = FinancialDataRow::from_record(record);
    sqlx::query(
        "INSERT INTO financial_data (id, boolean_value, term_sheet_status, numeric_value,
         date_value, composite_value_type, composite_value_data, percentage_multiple_type,
         percentage_multiple_data, names_list_type, names_list_data, financial_ratio_type,
         financial_ratio_data, percentage_condition_type, percentage_condition_data,
         created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
    )
    .bind(row.id)
    .bind(row.boolean_value)
    .bind(row.term_sheet_status)
    .bind(row.numeric_value)
    .bind(row.date_value)
    .bind(row.composite_value_type)
    .bind(row.composite_value_data)
    .bind(row.percentage_multiple_type)
    .bind(row.percentage_multiple_data)
    .bind(row.names_list_type)
    .bind(row.names_list_data)
    .bind(row.financial_ratio_type)
    .bind(row.financial_ratio_data)
    .bind(row.percentage_condition_type)
    .bind(row.percentage_condition_data)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite every column of an existing record except `created_at`.
///
/// Returns `false` if no row has the record's id.
pub async fn update(pool: &PgPool, record: &TermSheetRecord) -> Result<bool, sqlx::Error> {
    let row = FinancialDataRow::from_record(record);
    let result = sqlx::query(
        "UPDATE financial_data SET boolean_value = $2, term_sheet_status = $3,
         numeric_value = $4, date_value = $5,
         composite_value_type = $6, composite_value_data = $7,
         percentage_multiple_type = $8, percentage_multiple_data = $9,
         names_list_type = $10, names_list_data = $11,
         financial_ratio_type = $12, financial_ratio_data = $13,
         percentage_condition_type = $14, percentage_condition_data = $15,
         updated_at = $16
         WHERE id = $1",
    )
    .bind(row.id)
    .bind(row.boolean_value)
    .bind(row.term_sheet_status)
    .bind(row.numeric_value)
    .bind(row.date_value)
    .bind(row.composite_value_type)
    .bind(row.composite_value_data)
    .bind(row.percentage_multiple_type)
    .bind(row.percentage_multiple_data)
    .bind(row.names_list_type)
    .bind(row.names_list_data)
    .bind(row.financial_ratio_type)
    .bind(row.financial_ratio_data)
    .bind(row.percentage_condition_type)
    .bind(row.percentage_condition_data)
    .bind(row.updated_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a record. Returns `false` if no row had the id.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM financial_data WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all records in id order for startup hydration.
///
/// Rows whose status or slot columns no longer project are skipped and logged.
pub async fn load_all(pool: &PgPool) -> Result<Vec<TermSheetRecord>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM financial_data ORDER BY id");
    let rows = sqlx::query_as::<_, FinancialDataRow>(&query)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id;
            match row.into_record() {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::error!(
                        record_id = id,
                        error = %e,
                        "skipping unreadable financial_data row"
                    );
                    None
                }
            }
        })
        .collect())
}

/// Internal row type for SQLx mapping.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
struct FinancialDataRow {
    id: i64,
    boolean_value: Option<bool>,
    term_sheet_status: Option<String>,
    numeric_value: Option<f64>,
    date_value: Option<NaiveDate>,
    composite_value_type: Option<String>,
    composite_value_data: Option<Value>,
    percentage_multiple_type: Option<String>,
    percentage_multiple_data: Option<Value>,
    names_list_type: Option<String>,
    names_list_data: Option<Value>,
    financial_ratio_type: Option<String>,
    financial_ratio_data: Option<Value>,
    percentage_condition_type: Option<String>,
    percentage_condition_data: Option<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FinancialDataRow {
    fn from_record(record: &TermSheetRecord) -> Self {
        let (composite_value_type, composite_value_data) =
            store_optional(record.composite_value.as_ref());
        let (percentage_multiple_type, percentage_multiple_data) =
            store_optional(record.percentage_multiple.as_ref());
        let (names_list_type, names_list_data) = store_optional(record.names_list.as_ref());
        let (financial_ratio_type, financial_ratio_data) =
            store_optional(record.financial_ratio.as_ref());
        let (percentage_condition_type, percentage_condition_data) =
            store_optional(record.percentage_condition.as_ref());
        Self {
            id: record.id,
            boolean_value: record.boolean_value,
            term_sheet_status: record.term_sheet_status.map(|s| s.as_str().to_string()),
            numeric_value: record.numeric_value,
            date_value: record.date_value,
            composite_value_type,
            composite_value_data,
            percentage_multiple_type,
            percentage_multiple_data,
            names_list_type,
            names_list_data,
            financial_ratio_type,
            financial_ratio_data,
            percentage_condition_type,
            percentage_condition_data,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    fn into_record(self) -> Result<TermSheetRecord, sqlx::Error> {
        let term_sheet_status = self
            .term_sheet_status
            .as_deref()
            .map(str::parse::<TermSheetStatus>)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(TermSheetRecord {
            id: self.id,
            boolean_value: self.boolean_value,
            term_sheet_status,
            numeric_value: self.numeric_value,
            date_value: self.date_value,
            composite_value: project(
                self.composite_value_type.as_deref(),
                self.composite_value_data.as_ref(),
            )?,
            percentage_multiple: project(
                self.percentage_multiple_type.as_deref(),
                self.percentage_multiple_data.as_ref(),
            )?,
            names_list: project(
                self.names_list_type.as_deref(),
                self.names_list_data.as_ref(),
            )?,
            financial_ratio: project(
                self.financial_ratio_type.as_deref(),
                self.financial_ratio_data.as_ref(),
            )?,
            percentage_condition: project(
                self.percentage_condition_type.as_deref(),
                self.percentage_condition_data.as_ref(),
            )?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn project<S: Slot>(tag: Option<&str>, payload: Option<&Value>) -> Result<Option<S>, sqlx::Error> {
    project_optional(tag, payload).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
