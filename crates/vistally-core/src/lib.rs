//! vistally core: counter keys, stored-value coercion, and the shared error
//! surface.
//!
//! This crate defines the primitives shared by the widget runtime and by
//! embedders. It intentionally carries no transport or runtime dependencies
//! so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Counter slots are fed by arbitrary page URLs and whatever happens to be
//! stored remotely, so all of it is treated as untrusted input: malformed
//! content degrades to a harmless value instead of crashing the host page.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod count;
pub mod error;
pub mod key;

/// Shared result type.
pub use error::{Result, VistallyError};
pub use key::CounterKey;
