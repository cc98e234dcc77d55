//! Social-network GraphQL API over a property graph
//!
//! Requests carry an optional bearer token; the subject is loaded into a
//! [`context::RequestContext`] that guards and services share.

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod permissions;
pub mod relations;
pub mod resolver;
pub mod schema;
pub mod services;

pub use config::Config;
pub use context::{Identity, RequestContext, Role};
pub use error::{ApiError, ApiResult};
pub use schema::{build_schema, AppSchema};
