//! Domain layer: deposit records, batch processing, and staging.

pub mod entities;
pub mod errors;
pub mod ledger;
pub mod overlay;
