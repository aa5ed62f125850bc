//! # RoBart-Link: Motor Control Link Layer
//!
//! The firmware-adjacent side of the robot: packed wire messages for the
//! motor control board and the cooperative fixed-period scheduler its main
//! loop runs on. The navigation core treats this layer as plumbing; it is
//! kept thin on purpose.
//!
//! ## Wire Protocol
//!
//! Records are packed little-endian, at most 256 bytes, with a one-byte
//! total length followed by a one-byte message ID:
//!
//! ```text
//! ┌─────┬─────┬──────────────────┐
//! │ LEN │ ID  │ PAYLOAD          │
//! └─────┴─────┴──────────────────┘
//! ```
//!
//! ```rust
//! use robart_link::LinkMessage;
//!
//! let record = LinkMessage::motor(0.5, 0.5).encode();
//! let decoded = LinkMessage::decode(&record).unwrap();
//! assert_eq!(decoded, LinkMessage::motor(0.5, 0.5));
//! ```

pub mod error;
pub mod messages;
pub mod ticker;

pub use error::{Error, Result};
pub use messages::{LinkMessage, MessageId, MAX_MESSAGE_SIZE};
pub use ticker::PeriodicTask;
