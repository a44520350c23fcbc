//! Domain layer: the account entity and its errors.

pub mod account;
pub mod errors;
