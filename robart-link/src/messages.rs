//! Wire messages exchanged with the motor control board.
//!
//! Packet format: [LEN] [ID] [PAYLOAD], little-endian, where LEN is the
//! total record length in bytes including the two header bytes. Records
//! never exceed [`MAX_MESSAGE_SIZE`] bytes. Message IDs must be kept in
//! sync with the board firmware: add new messages at the end, never
//! reorder, rename deprecated messages in place.

use crate::error::{Error, Result};

/// Maximum size of a wire record in bytes
pub const MAX_MESSAGE_SIZE: usize = 256;

/// Link message IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageId {
    /// Round-trip probe carrying the sender's timestamp
    Ping = 0x01,
    /// Reply to a ping, echoing the timestamp
    Pong = 0x02,
    /// Enable or disable the motor watchdog
    Watchdog = 0x03,
    /// Motor PWM carrier frequency
    Pwm = 0x04,
    /// Direct motor throttle control
    Motor = 0x10,
}

/// Messages exchanged over the motor control link
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkMessage {
    /// Round-trip probe
    Ping {
        /// Sender timestamp in seconds
        timestamp: f64,
    },
    /// Reply to a ping
    Pong {
        /// Echoed timestamp in seconds
        timestamp: f64,
    },
    /// Watchdog configuration: when enabled, motors stop unless a command
    /// arrives within the timeout
    Watchdog {
        /// Watchdog armed flag
        enabled: bool,
        /// Timeout in seconds
        timeout_seconds: f64,
    },
    /// PWM carrier frequency
    Pwm {
        /// Frequency in Hz
        frequency_hz: u16,
    },
    /// Direct motor throttle, clamped to [-1, 1] per side
    Motor {
        /// Left motor throttle
        left_throttle: f32,
        /// Right motor throttle
        right_throttle: f32,
    },
}

impl LinkMessage {
    /// Motor message with both throttles clamped to [-1, 1]
    pub fn motor(left_throttle: f32, right_throttle: f32) -> Self {
        LinkMessage::Motor {
            left_throttle: left_throttle.clamp(-1.0, 1.0),
            right_throttle: right_throttle.clamp(-1.0, 1.0),
        }
    }

    /// Get the message ID
    pub fn id(&self) -> MessageId {
        match self {
            LinkMessage::Ping { .. } => MessageId::Ping,
            LinkMessage::Pong { .. } => MessageId::Pong,
            LinkMessage::Watchdog { .. } => MessageId::Watchdog,
            LinkMessage::Pwm { .. } => MessageId::Pwm,
            LinkMessage::Motor { .. } => MessageId::Motor,
        }
    }

    /// Build the payload bytes (everything after the two header bytes)
    fn build_payload(&self) -> Vec<u8> {
        match self {
            LinkMessage::Ping { timestamp } | LinkMessage::Pong { timestamp } => {
                timestamp.to_le_bytes().to_vec()
            }
            LinkMessage::Watchdog {
                enabled,
                timeout_seconds,
            } => {
                let mut payload = Vec::with_capacity(9);
                payload.push(u8::from(*enabled));
                payload.extend_from_slice(&timeout_seconds.to_le_bytes());
                payload
            }
            LinkMessage::Pwm { frequency_hz } => frequency_hz.to_le_bytes().to_vec(),
            LinkMessage::Motor {
                left_throttle,
                right_throttle,
            } => {
                let mut payload = Vec::with_capacity(8);
                payload.extend_from_slice(&left_throttle.clamp(-1.0, 1.0).to_le_bytes());
                payload.extend_from_slice(&right_throttle.clamp(-1.0, 1.0).to_le_bytes());
                payload
            }
        }
    }

    /// Encode the message into wire bytes
    pub fn encode(&self) -> Vec<u8> {
        let payload = self.build_payload();
        let num_bytes = 2 + payload.len();
        debug_assert!(num_bytes <= MAX_MESSAGE_SIZE);

        let mut record = Vec::with_capacity(num_bytes);
        record.push(num_bytes as u8);
        record.push(self.id() as u8);
        record.extend_from_slice(&payload);
        record
    }

    /// Decode one message from wire bytes
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < 2 {
            return Err(Error::Truncated(data.len()));
        }

        let num_bytes = data[0] as usize;
        if data.len() < num_bytes {
            return Err(Error::LengthMismatch {
                expected: num_bytes,
                actual: data.len(),
            });
        }

        let id = data[1];
        let payload = &data[2..num_bytes];

        match id {
            id if id == MessageId::Ping as u8 => Ok(LinkMessage::Ping {
                timestamp: read_f64(payload, 0)?,
            }),
            id if id == MessageId::Pong as u8 => Ok(LinkMessage::Pong {
                timestamp: read_f64(payload, 0)?,
            }),
            id if id == MessageId::Watchdog as u8 => {
                if payload.is_empty() {
                    return Err(Error::Truncated(data.len()));
                }
                Ok(LinkMessage::Watchdog {
                    enabled: payload[0] != 0,
                    timeout_seconds: read_f64(payload, 1)?,
                })
            }
            id if id == MessageId::Pwm as u8 => {
                if payload.len() < 2 {
                    return Err(Error::Truncated(data.len()));
                }
                Ok(LinkMessage::Pwm {
                    frequency_hz: u16::from_le_bytes([payload[0], payload[1]]),
                })
            }
            id if id == MessageId::Motor as u8 => Ok(LinkMessage::motor(
                read_f32(payload, 0)?,
                read_f32(payload, 4)?,
            )),
            unknown => Err(Error::UnknownId(unknown)),
        }
    }
}

fn read_f64(payload: &[u8], offset: usize) -> Result<f64> {
    let bytes: [u8; 8] = payload
        .get(offset..offset + 8)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(Error::Truncated(payload.len()))?;
    Ok(f64::from_le_bytes(bytes))
}

fn read_f32(payload: &[u8], offset: usize) -> Result<f32> {
    let bytes: [u8; 4] = payload
        .get(offset..offset + 4)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(Error::Truncated(payload.len()))?;
    Ok(f32::from_le_bytes(bytes))
}
