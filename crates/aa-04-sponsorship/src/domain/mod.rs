//! Domain layer: subscription entities, errors, and the subsidy ledger.

pub mod entities;
pub mod errors;
pub mod subsidy;
