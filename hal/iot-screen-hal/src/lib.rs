//! IoT Screen Hardware Abstraction Layer
//!
//! This crate defines the narrow interfaces the panel pipeline consumes from
//! the board: a single outbound network link and a read-only asset store.
//! Board crates implement them on top of their network stack and flash.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Pipeline (iot-screen-core)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  iot-screen-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  TCP link     │       │ static assets │
//! │ (embassy-net) │       │   (flash)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`link::Link`] - Outbound connection to the status feed
//! - [`storage::AssetStore`] - Path-addressed read-only assets

#![no_std]
#![deny(unsafe_code)]

pub mod link;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use link::{Endpoint, Link, LinkError, LinkEvent, LinkState};
pub use storage::{AssetEntry, AssetError, AssetStore, StaticAssets};
