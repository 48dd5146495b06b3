//! Authority tokens and the single enforcement gate they are checked
//! against.

mod audit;
mod enforcer;
mod errors;
mod types;

pub use audit::{AuditEvent, AuditSink};
pub use enforcer::{Decision, Enforcer};
pub use errors::AuthorityTagError;
pub use types::{AuthorityLevel, AuthorityToken, DenialReason, NetworkPolicy};
