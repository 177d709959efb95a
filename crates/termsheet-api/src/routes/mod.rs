//! # API Route Modules
//!
//! - `financial_data`: CRUD over term sheet records at `/financial_data/`.

pub mod financial_data;
