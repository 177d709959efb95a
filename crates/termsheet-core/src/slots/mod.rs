//! # Composite Slots
//!
//! The five tagged composite fields of a term sheet record. Each module
//! holds one slot's sum type and its [`crate::Slot`] implementation.
//!
//! | Slot | Tags |
//! |------|------|
//! | [`CompositeValue`] | `number`, `greater_of`, `no_minimum`, `no_pik` |
//! | [`PercentageMultiple`] | `percentage`, `no_cash_requirement`, `not_stated` |
//! | [`NamesList`] | `names_list`, `na` |
//! | [`FinancialRatio`] | six ratio kinds, `no_covenant`, `not_stated` |
//! | [`PercentageCondition`] | `with_leverage_test`, `no_leverage_test`, `basket_no_component`, `no_basket`, `not_stated` |

pub mod composite_value;
pub mod financial_ratio;
pub mod names_list;
pub mod percentage_condition;
pub mod percentage_multiple;

pub use composite_value::{CompositeValue, GreaterOf};
pub use financial_ratio::FinancialRatio;
pub use names_list::NamesList;
pub use percentage_condition::{LeverageTest, PercentageCondition};
pub use percentage_multiple::PercentageMultiple;
