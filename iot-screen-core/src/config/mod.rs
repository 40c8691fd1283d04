//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware fills them from
//! constants generated at build time out of `panel.toml`.

pub mod types;

pub use types::*;
