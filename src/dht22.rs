use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::error::{DhtError, ErrorKind};
use crate::frame::{Frame, TemperatureUnit};

/// Bits in one complete transfer.
const FRAME_BITS: u32 = 40;

/// Start-signal low hold in milliseconds. The datasheet asks for at
/// least 1 ms.
const START_LOW_MS: u32 = 2;

/// Bound on the idle-high phase before the sensor pulls the released
/// line low to begin its acknowledgment.
const ACK_ENTRY_TIMEOUT_US: u32 = 40;

/// Bound on each of the sensor's nominally 80us acknowledgment phases,
/// loosened to tolerate clock and signal jitter.
const ACK_PHASE_TIMEOUT_US: u32 = 100;

/// Bound on the nominally 50us low gap between bits. Overrunning it
/// means synchronization with the sensor was lost.
const BIT_GAP_TIMEOUT_US: u32 = 65;

/// Bound on the high-pulse measurement. Anything this long is already
/// outside both symbol windows, so a stuck-high line becomes a reported
/// error instead of an endless wait.
const PULSE_TIMEOUT_US: u32 = 150;

/// High-pulse duration window for a 0 bit, inclusive. Nominal is
/// 26-28us.
const ZERO_PULSE_MIN_US: u32 = 20;
const ZERO_PULSE_MAX_US: u32 = 49;

/// High-pulse duration window for a 1 bit, inclusive. Nominal is 70us.
const ONE_PULSE_MIN_US: u32 = 50;
const ONE_PULSE_MAX_US: u32 = 100;

/// Driver for the DHT22/AM2302 temperature and humidity sensor.
///
/// Owns the shared data line and the driver's sticky state: the last
/// frame that passed validation and the most recent protocol fault.
/// Construction performs no I/O.
///
/// The caller must leave at least 2 seconds between read attempts on the
/// same sensor and must not issue overlapping attempts; the driver
/// enforces neither.
pub struct Dht22<PIN, D> {
    pin: PIN,
    delay: D,
    frame: Frame,
    error: Option<ErrorKind>,
}

/// A validated reading, converted to physical units.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

impl Reading {
    fn from_frame(frame: Frame) -> Self {
        Reading {
            temperature: frame.temperature(TemperatureUnit::Celsius),
            relative_humidity: frame.humidity(),
        }
    }
}

/// Classifies a measured high-pulse duration into a frame bit.
fn classify_pulse(duration_us: u32) -> Option<u64> {
    match duration_us {
        ZERO_PULSE_MIN_US..=ZERO_PULSE_MAX_US => Some(0),
        ONE_PULSE_MIN_US..=ONE_PULSE_MAX_US => Some(1),
        _ => None,
    }
}

impl<PIN, DELAY, E> Dht22<PIN, DELAY>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new instance of the driver.
    ///
    /// # Arguments
    ///
    /// * `pin` - The GPIO pin connected to the sensor's data line. Must
    ///   support both input and output.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(pin: PIN, delay: DELAY) -> Self {
        Dht22 {
            pin,
            delay,
            frame: Frame::default(),
            error: None,
        }
    }

    /// Performs one full read attempt: handshake, 40-bit decode,
    /// checksum validation.
    ///
    /// On success the decoded frame replaces the stored one and the
    /// converted reading is returned. On a protocol fault the fault is
    /// latched (see [`Dht22::current_error`]), the stored frame is left
    /// untouched and the error is returned. A successful attempt never
    /// clears a previously latched fault.
    ///
    /// HAL pin errors are propagated but not latched; they are outside
    /// the protocol fault taxonomy.
    pub fn attempt_read(&mut self) -> Result<Reading, DhtError<E>> {
        match self.read_frame() {
            Ok(frame) => {
                self.frame = frame;
                Ok(Reading::from_frame(frame))
            }
            Err(e) => {
                if let DhtError::Protocol(kind) = &e {
                    self.error = Some(*kind);
                }
                Err(e)
            }
        }
    }

    /// Temperature derived from the last valid frame.
    ///
    /// Stale (zero) until the first successful [`Dht22::attempt_read`];
    /// check [`Dht22::current_error`] first.
    pub fn temperature_reading(&self, unit: TemperatureUnit) -> f32 {
        self.frame.temperature(unit)
    }

    /// Relative humidity derived from the last valid frame. Same
    /// staleness caveat as [`Dht22::temperature_reading`].
    pub fn humidity_reading(&self) -> f32 {
        self.frame.humidity()
    }

    /// The last frame that passed validation, zero if none yet.
    pub fn last_frame(&self) -> Frame {
        self.frame
    }

    /// The latched protocol fault, if any.
    ///
    /// The latch is sticky: it survives later attempts, including
    /// successful ones, until [`Dht22::clear_error`] is called.
    pub fn current_error(&self) -> Option<ErrorKind> {
        self.error
    }

    /// Clears the latched fault. The stored frame is not touched.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn read_frame(&mut self) -> Result<Frame, DhtError<E>> {
        self.handshake()?;
        let frame = self.decode_frame()?;
        if !frame.checksum_valid() {
            return Err(DhtError::Protocol(ErrorKind::ChecksumInvalid));
        }
        Ok(frame)
    }

    /// Sends the start signal and waits for the sensor's acknowledgment.
    ///
    /// The host holds the line low for [`START_LOW_MS`], then releases
    /// it to the sensor. No state is retained on failure.
    fn handshake(&mut self) -> Result<(), DhtError<E>> {
        self.pin.set_low()?;
        self.delay.delay_ms(START_LOW_MS);
        self.pin.set_high()?;

        self.await_acknowledgment()
    }

    /// Waits out the sensor's acknowledgment, three bounded phases: the
    /// released line dropping low, then the nominal 80us low and 80us
    /// high response pulses. Any overrun maps to
    /// [`ErrorKind::UnacknowledgedTransmission`].
    fn await_acknowledgment(&mut self) -> Result<(), DhtError<E>> {
        if self.pin.is_high()? {
            Self::wait_for(
                &mut self.delay,
                ACK_ENTRY_TIMEOUT_US,
                ErrorKind::UnacknowledgedTransmission,
                || self.pin.is_low(),
            )?;
        }

        Self::wait_for(
            &mut self.delay,
            ACK_PHASE_TIMEOUT_US,
            ErrorKind::UnacknowledgedTransmission,
            || self.pin.is_high(),
        )?;
        Self::wait_for(
            &mut self.delay,
            ACK_PHASE_TIMEOUT_US,
            ErrorKind::UnacknowledgedTransmission,
            || self.pin.is_low(),
        )?;
        Ok(())
    }

    /// Reads the 40 data bits, MSB first.
    ///
    /// Each bit is a bounded low gap followed by a high pulse whose
    /// measured duration is the symbol. Any fault discards the partial
    /// frame; there is no resuming a partial read.
    fn decode_frame(&mut self) -> Result<Frame, DhtError<E>> {
        let mut raw: u64 = 0;

        for _ in 0..FRAME_BITS {
            Self::wait_for(
                &mut self.delay,
                BIT_GAP_TIMEOUT_US,
                ErrorKind::PastReadIntervalLimit,
                || self.pin.is_high(),
            )?;

            let pulse_us = Self::wait_for(
                &mut self.delay,
                PULSE_TIMEOUT_US,
                ErrorKind::ReadLengthInvalid,
                || self.pin.is_low(),
            )?;

            let symbol = classify_pulse(pulse_us)
                .ok_or(DhtError::Protocol(ErrorKind::ReadLengthInvalid))?;
            raw = (raw << 1) | symbol;
        }

        Ok(Frame::from_raw(raw))
    }

    /// Deadline-bounded poll loop: samples the line once per microsecond
    /// until `reached` reports the expected level.
    ///
    /// Returns the elapsed microseconds on success. Once `deadline_us`
    /// samples have all failed the wait times out and `on_timeout` is
    /// reported, so an elapsed time equal to the deadline fails while one
    /// microsecond under it passes.
    fn wait_for<F>(
        delay: &mut DELAY,
        deadline_us: u32,
        on_timeout: ErrorKind,
        mut reached: F,
    ) -> Result<u32, DhtError<E>>
    where
        F: FnMut() -> Result<bool, E>,
    {
        for elapsed_us in 0..deadline_us {
            if reached()? {
                return Ok(elapsed_us);
            }
            delay.delay_us(1);
        }
        Err(DhtError::Protocol(on_timeout))
    }
}
