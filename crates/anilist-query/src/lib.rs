#![warn(missing_docs)]

//! Query-construction DSL for the AniList GraphQL API.
//!
//! A query is built as a tree of [`Field`]s carrying [`ArgumentValue`]s,
//! wrapped in an [`Operation`], and rendered to wire-ready text plus a
//! variables map by [`Operation::into_document`]. Building is pure and
//! deterministic: the same tree always produces byte-identical text.

mod error;
mod field;
mod operation;
mod value;

pub use error::QueryBuildError;
pub use field::Field;
pub use operation::{Document, Operation, OperationKind};
pub use value::{ArgumentValue, Variable};
