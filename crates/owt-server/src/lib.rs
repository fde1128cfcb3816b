//! # owt-server
//!
//! HTTP surface of the OWT service: layered configuration, the `owt-server`
//! CLI, and an axum router exposing the token engine behind the origin gate.
//!
//! | Route                                  | Gated | Result                         |
//! |----------------------------------------|-------|--------------------------------|
//! | `POST /api/v1/owt/GenerateOwtToken`    | yes   | `202` token, `406` on failure  |
//! | `POST /api/v1/owt/InValidateToken`     | yes   | `202` `"True"` / `"False"`     |
//! | `POST /api/v1/owt/GetPayloadFromToken` | yes   | `202` claims or `null`, `400`  |
//! | `GET /health`                          | no    | `200`                          |
//!
//! Rejected callers get an empty `401` before any handler runs.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod server;
pub mod state;

pub use cli::{Cli, Command};
pub use config::ServiceConfig;
pub use error::{ServerError, ServerResult};
pub use extract::{AllowedCaller, ConnectInfoExtractor};
pub use server::{API_PREFIX, build_router, serve};
pub use state::{AppState, origin_gate};
