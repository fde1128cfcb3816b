//! Origin authorization gate
//!
//! Admission control keyed on who is calling rather than what credential
//! they hold. The flow for each request is:
//!
//! 1. Read [`OriginSignals`] (agent string, host address)
//! 2. Reverse-resolve the host address through a [`ReverseResolver`]
//! 3. Apply the [`OriginPolicy`] to get an [`AuthorizationDecision`]
//! 4. On acceptance, attach a [`Principal`] with [`ALLOWED_CALLER_ROLE`]

mod gate;
pub mod identifier;
mod policy;
pub mod resolver;
mod signals;

pub use gate::{DEFAULT_LOOKUP_TIMEOUT, OriginGate};
pub use identifier::derive_client_label;
pub use policy::{ALLOWED_CALLER_ROLE, AuthorizationDecision, OriginPolicy, Principal};
pub use resolver::{ReverseResolver, StaticResolver, SystemResolver};
pub use signals::{OriginSignals, X_FORWARDED_FOR, X_REAL_IP};
