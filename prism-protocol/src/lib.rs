//! Prism Node Link Protocol
//!
//! This crate defines the event model used throughout the firmware and the
//! byte-stuffed serial framing used to exchange events between the controller
//! and the RGB node. Every frame carries exactly one event.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌──────┬──────────┬───────┬──────┬──────┐
//! │ FLAG │ HARDWARE │ EVENT │ DATA │ FLAG │
//! │ 0x7E │ 1-2B     │ 1-2B  │ 1-2B │ 0x7E │
//! └──────┴──────────┴───────┴──────┴──────┘
//! ```
//!
//! A payload byte equal to `0x7E` or `0x7D` is sent as `0x7D, byte ^ 0x20`.
//! There is no checksum, acknowledgment or retransmission; a frame of the
//! wrong length is dropped and the decoder resynchronises on the next flag.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod events;
pub mod frame;

pub use events::{Event, EventKind, HardwareId};
pub use frame::{
    encode, encode_to_vec, DecodeState, DecoderStats, FrameDecoder, Payload, ESCAPE, FLAG,
    PAYLOAD_LEN,
};
