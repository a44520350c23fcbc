//! Domain layer: credential entities, errors, and the permission engine.

pub mod entities;
pub mod errors;
pub mod registry;
