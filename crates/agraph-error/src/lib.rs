//! # agraph-error
//!
//! Unified error handling for agraph.
//!
//! - **ErrorKind**: what went wrong (e.g. ConfigInvalid, IoFailed)
//! - **Operation**: where it went wrong (e.g. `report::close`)
//! - **Context**: key/value pairs that help locate the cause
//! - **Source**: the wrapped underlying error, if any
//!
//! ## Usage
//!
//! ```rust
//! use agraph_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::InvalidFormat, "duplicate artifact id")
//!         .with_operation("manifest::build")
//!         .with_context("id", "c:app.A"))
//! }
//! ```
//!
//! All fallible functions return `agraph_error::Result<T>`. External errors are
//! wrapped with `set_source(err)`; callers further up only append context.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using agraph Error
pub type Result<T> = std::result::Result<T, Error>;
