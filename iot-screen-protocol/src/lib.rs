//! IoT Screen status record protocol
//!
//! This crate defines the binary record the status feed sends to the panel
//! and the validating decoder the panel uses to read it.
//!
//! # Record Overview
//!
//! Each record is a FlatBuffers table with two string fields:
//! ```text
//! ┌──────────┬──────────────────┬─────────────────┬──────────┬──────────┐
//! │ ROOT     │ VTABLE           │ TABLE           │ APP      │ PAYLOAD  │
//! │ u32      │ u16 × 4          │ i32 + u32 × 2   │ len+utf8 │ len+utf8 │
//! └──────────┴──────────────────┴─────────────────┴──────────┴──────────┘
//! ```
//!
//! Records arrive over TCP with no extra framing; one read fills at most
//! [`FRAME_CAPACITY`] bytes. Every offset in the record is checked against
//! the received span before a string view is handed out.

#![no_std]
#![deny(unsafe_code)]

pub mod message;
pub mod record;

pub use message::{Message, MessageKind, PING_APP};
pub use record::{
    decode, encode, DecodeError, EncodeError, FRAME_CAPACITY, MAX_APP_LEN, MAX_PAYLOAD_LEN,
    MIN_RECORD_LEN,
};
