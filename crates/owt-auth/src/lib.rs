//! # OWT Auth - Token Engine and Origin Gate
//!
//! Core library of the OWT service. It issues and verifies HMAC-SHA256 signed
//! tokens carrying a fixed claim set, and decides per request whether a caller
//! may use the service at all, based on where the request comes from.
//!
//! ## Token engine
//!
//! ```rust
//! use std::sync::Arc;
//! use owt_auth::{ClaimSetRequest, DelimitedList, SigningKey, TokenIssuer, TokenValidator};
//!
//! # fn main() -> owt_auth::OwtResult<()> {
//! let key = Arc::new(SigningKey::from_material("shared-secret")?);
//! let issuer = TokenIssuer::new(Arc::clone(&key));
//! let validator = TokenValidator::new(
//!     key,
//!     DelimitedList::parse("svcA"),
//!     DelimitedList::parse("appB"),
//! );
//!
//! let token = issuer.issue(&ClaimSetRequest::new("svcA", "appB").with_role("Admin"))?;
//! let header = format!("Bearer {token}");
//! assert!(validator.validate(Some(&header)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Origin gate
//!
//! The [`origin::OriginGate`] derives a client identifier from the
//! `User-Agent` header or the reverse-DNS name of the caller, then applies a
//! default-deny allow-list with a block-list override. With the `middleware`
//! feature, [`tower::OriginGateLayer`] wraps any `http::Request` service.
//!
//! ## Features
//!
//! - `middleware` (default) - Tower Layer/Service for the origin gate

pub mod audit;
pub mod claims;
pub mod error;
pub mod key;
pub mod list;
pub mod origin;
pub mod token;

#[cfg(feature = "middleware")]
pub mod tower;

pub use audit::{AuditLogger, OwtEvent};
pub use claims::{ClaimSet, ClaimSetRequest};
pub use error::{OwtError, OwtResult};
pub use key::SigningKey;
pub use list::DelimitedList;
pub use origin::{
    ALLOWED_CALLER_ROLE, AuthorizationDecision, OriginGate, OriginPolicy, OriginSignals,
    Principal, ReverseResolver,
};
pub use token::{TokenIssuer, TokenValidator, Verification, bearer_token};
