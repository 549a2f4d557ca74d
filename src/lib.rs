#![warn(missing_docs)]

//! A client toolkit for the AniList GraphQL API.
//!
//! Three layers, usable separately or through [`AnilistClient`]:
//!
//! - a typed query DSL ([`anilist_query`], re-exported here) that
//!   builds GraphQL documents without string concatenation;
//! - a resilient executor ([`GraphQlExecutor`] plus [`RetryPolicy`])
//!   that speaks GraphQL-over-HTTP, honors `Retry-After` on rate
//!   limits, and never retries semantic errors;
//! - a pagination engine ([`Pagination`]) for AniList's `Page`
//!   convention, with all-or-nothing delivery.
//!
//! Results stay as raw `serde_json` values; interpreting them into
//! typed records is left to callers. Authentication is pluggable via
//! [`auth::AuthProvider`].

pub mod auth;
mod client;
mod error;
mod executor;
mod pagination;
pub mod prebuilt;
mod response;
mod retry;
#[cfg(test)]
mod testing;

pub use anilist_query::{
    ArgumentValue, Document, Field, Operation, OperationKind, QueryBuildError, Variable,
};

pub use client::{AnilistClient, DEFAULT_ENDPOINT};
pub use error::ClientError;
pub use executor::GraphQlExecutor;
pub use pagination::{Pagination, MAX_PER_PAGE};
pub use response::{GraphQlError, GraphQlErrorLocation, PathSegment, QueryEnvelope};
pub use retry::{RetryDecision, RetryPolicy};
