//! Message pipeline stages
//!
//! ```text
//! Link ─► FrameReader ─► decode ─► Dispatcher ─► RenderTarget
//! ```
//!
//! The boot sequence renders through the same target before the first frame.

pub mod boot;
pub mod dispatch;
pub mod reader;

pub use boot::{BootReport, BootSequencer, SplashOutcome, BANNER};
pub use dispatch::{DispatchOutcome, Dispatcher, DropReason};
pub use reader::FrameReader;
