//! Top-level facade crate for vistally.
//!
//! Re-exports core types and the widget library so embedders can depend on
//! a single crate.

pub mod core {
    pub use vistally_core::*;
}

pub mod widget {
    pub use vistally_widget::*;
}
