//! # Session Keys Subsystem (AA-03)
//!
//! Scoped, time-limited delegated credentials: an account owner grants a
//! secondary signing key a narrow permission envelope (targets, selectors,
//! value caps, call budget, validity window) and the registry decides
//! whether a given authorization may act on the account's behalf.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): credential entities, the permission
//!   engine, no I/O
//! - **Events** (`events/`): observability payloads drained by the
//!   embedding account
//!
//! ## Security Notes
//!
//! - The sensitive-selector blocklist runs before any allow-list and no
//!   credential configuration can override it.
//! - Usage counters advance only on full acceptance; a rejected
//!   authorization leaves the credential untouched.
//! - Revocation is immediate and permanent; a revoked identity cannot be
//!   re-registered until the original entry lapses.

pub mod domain;
pub mod events;

// Re-export public API
pub use domain::entities::{
    KeyIdentity, KeyMaterial, SessionKey, SessionKeyDescriptor, MAX_ALLOWED_SELECTORS,
    MAX_ALLOWED_TARGETS,
};
pub use domain::errors::SessionKeyError;
pub use domain::registry::SessionKeyRegistry;
pub use events::payloads::{KeyGrantedPayload, KeyRevokedPayload, KeyUsedPayload};
pub use events::SessionKeyEvent;
