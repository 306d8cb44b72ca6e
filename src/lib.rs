//! AM2302/DHT22 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the AM2302 (DHT22)
//! temperature and humidity sensor, built on top of the [`embedded-hal`]
//! traits. The sensor speaks a one-wire, time-encoded protocol: host and
//! sensor take turns driving a single data line, and every symbol is a
//! pulse duration, not a voltage level. The driver runs the full
//! exchange (handshake, 40-bit timing decode, checksum validation) and
//! classifies every fault by the protocol phase that detected it.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Pulse durations measured by microsecond-resolution polling, so no
//!   hardware timer capture is needed
//! - Sticky fault latch: the last protocol fault is retained until
//!   explicitly cleared, surviving later successful reads
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for the shared data line
//! - [`DelayNs`] for accurate timing
//!
//! # Caller obligations
//! Leave at least 2 seconds between read attempts on the same sensor
//! and serialize access to each driver instance externally; the driver
//! enforces neither.
//!
//! # Conversion note
//! Physical values are derived with truncating division by ten, so the
//! tenths digit the wire format carries is dropped: a temperature field
//! of 255 reads as 25.0 C, not 25.5 C.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

pub mod dht22;
pub mod error;
pub mod frame;

pub use dht22::{Dht22, Reading};
pub use error::{DhtError, ErrorKind};
pub use frame::{Frame, TemperatureUnit};
