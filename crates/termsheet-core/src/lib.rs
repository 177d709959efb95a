//! # termsheet-core: Foundational Types for Term Sheet Records
//!
//! This crate defines the closed vocabulary of a financial term sheet record
//! and the rules for moving it between its two representations:
//!
//! - the **wire form**, a JSON object per slot carrying a `type` discriminator
//!   next to the variant's fields, and
//! - the **stored form**, a `(tag, payload)` pair per slot that maps onto a
//!   bounded string column and a JSONB column.
//!
//! ## Key Design Principles
//!
//! 1. **One sum type per slot.** Each of the five composite slots is an enum
//!    with one variant per tag. Ingest and projection both go through an
//!    exhaustive `match`, so the two directions cannot drift apart.
//!
//! 2. **One reader, one writer.** [`Slot::parse`] is the only place a slot's
//!    fields are read and [`Slot::payload`] the only place they are written.
//!    Wire ingest, stored projection, and serde all delegate to them.
//!
//! 3. **Absent is not a marker.** An unset slot is `None` and disappears from
//!    the wire object; a marker variant (e.g. `no_covenant`) is a populated
//!    slot with an empty payload.
//!
//! ## Crate Policy
//!
//! - No dependencies on other workspace crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod payload;
pub mod record;
pub mod slot;
pub mod slots;
pub mod status;

pub use error::{SlotError, ValidationError};
pub use payload::PayloadReader;
pub use record::TermSheetFields;
pub use slot::{project_optional, store_optional, Slot, StoredSlot};
pub use slots::{
    CompositeValue, FinancialRatio, GreaterOf, LeverageTest, NamesList, PercentageCondition,
    PercentageMultiple,
};
pub use status::TermSheetStatus;
