//! Typed JSON Schema parsing for route parameters and HTTP payloads.
//!
//! A [`Schema<T>`] pairs a compiled JSON Schema 2020-12 validator with the
//! Rust type that validated values deserialize into. Two modes are offered:
//! [`Schema::parse`] returns a `Result`, [`Schema::safe_parse`] returns a
//! [`SafeParse`] outcome for callers that branch on success.
//!
//! Values that arrive as strings (path segments, query strings) can be
//! coerced toward the scalar types a schema declares before validation.

pub mod coerce;
pub mod config;
pub mod error;
pub mod schema;
pub mod strict;
pub mod validator;

pub use config::SchemaConfig;
pub use error::{Result, SchemaError};
pub use schema::{SafeParse, Schema};
