//! The 40-bit frame transferred by the sensor and its field layout.
//!
//! A transfer is five bytes, most significant first: 16 bits of relative
//! humidity (value x10), 16 bits of temperature (bit 15 is a sign flag,
//! the remaining 15 bits are the magnitude x10) and an 8-bit checksum over
//! the four data bytes.

/// Unit selector for [`Frame::temperature`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

/// Mask keeping the low 40 bits of the accumulator.
const FRAME_MASK: u64 = 0xFF_FFFF_FFFF;

/// Sign flag in the 16-bit temperature field.
const TEMPERATURE_SIGN_MASK: u16 = 0x8000;

/// A complete 40-bit frame as shifted in off the wire, MSB first.
///
/// `Frame` is a plain value type; it carries no indication of whether its
/// checksum has been verified. The driver only ever stores frames that
/// passed [`Frame::checksum_valid`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame(u64);

impl Frame {
    /// Wraps a raw 40-bit value. Bits above 39 are discarded.
    pub const fn from_raw(raw: u64) -> Self {
        Frame(raw & FRAME_MASK)
    }

    /// The raw 40-bit value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Relative humidity field, in tenths of a percent.
    pub const fn humidity_raw(self) -> u16 {
        (self.0 >> 24) as u16
    }

    /// Temperature field, sign flag included, magnitude in tenths of a
    /// degree Celsius.
    pub const fn temperature_raw(self) -> u16 {
        (self.0 >> 8) as u16
    }

    /// Checksum byte as transmitted by the sensor.
    pub const fn checksum(self) -> u8 {
        self.0 as u8
    }

    /// Verifies the checksum: the byte-wise sum of the four data bytes,
    /// truncated to 8 bits, must equal the checksum byte. The wrapping add
    /// mirrors the sensor's own algorithm.
    pub fn checksum_valid(self) -> bool {
        let sum = ((self.0 >> 32) as u8)
            .wrapping_add((self.0 >> 24) as u8)
            .wrapping_add((self.0 >> 16) as u8)
            .wrapping_add((self.0 >> 8) as u8);
        sum == self.checksum()
    }

    /// Relative humidity in percent.
    ///
    /// The division truncates, dropping the tenths digit the field
    /// carries: a field value of 555 reads as 55.0, not 55.5.
    pub fn humidity(self) -> f32 {
        (self.humidity_raw() / 10) as f32
    }

    /// Temperature in the requested unit.
    ///
    /// Bit 15 of the field flags a below-zero reading; the magnitude is
    /// converted first and the sign applied after, for Fahrenheit as well.
    /// The Celsius division truncates, same as [`Frame::humidity`].
    pub fn temperature(self, unit: TemperatureUnit) -> f32 {
        let field = self.temperature_raw();
        let below_zero = field & TEMPERATURE_SIGN_MASK != 0;
        let magnitude = field & !TEMPERATURE_SIGN_MASK;

        let celsius = (magnitude / 10) as f32;
        let converted = match unit {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 1.8 + 32.0,
        };

        if below_zero { -converted } else { converted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Packs the three fields into a frame without touching the checksum.
    fn pack(humidity: u16, temperature: u16, checksum: u8) -> Frame {
        Frame::from_raw(
            (humidity as u64) << 24 | (temperature as u64) << 8 | checksum as u64,
        )
    }

    /// Packs the fields with the checksum the sensor would compute.
    fn pack_checked(humidity: u16, temperature: u16) -> Frame {
        let [hum_hi, hum_lo] = humidity.to_be_bytes();
        let [temp_hi, temp_lo] = temperature.to_be_bytes();
        let checksum = hum_hi
            .wrapping_add(hum_lo)
            .wrapping_add(temp_hi)
            .wrapping_add(temp_lo);
        pack(humidity, temperature, checksum)
    }

    #[test]
    fn checksum_accepts_matching_frame() {
        // 0x01 + 0xF4 + 0x00 + 0xC8 = 0x1BD, truncated to 0xBD
        let frame = pack(0x01F4, 0x00C8, 0xBD);
        assert!(frame.checksum_valid());
    }

    #[test]
    fn checksum_rejects_mismatched_frame() {
        let frame = pack(0x01F4, 0x00C8, 0xBE);
        assert!(!frame.checksum_valid());
    }

    #[test]
    fn checksum_sum_wraps_at_eight_bits() {
        // 0xFF + 0xFF + 0xFF + 0xFF = 0x3FC, truncated to 0xFC
        let frame = pack(0xFFFF, 0xFFFF, 0xFC);
        assert!(frame.checksum_valid());
    }

    #[test]
    fn field_extraction_matches_layout() {
        let frame = pack(0x0237, 0x80FA, 0x5C);
        assert_eq!(frame.humidity_raw(), 0x0237);
        assert_eq!(frame.temperature_raw(), 0x80FA);
        assert_eq!(frame.checksum(), 0x5C);
    }

    #[test]
    fn from_raw_discards_bits_above_forty() {
        let frame = Frame::from_raw(0xAB_01_F400_C8BD);
        assert_eq!(frame.raw(), 0x01_F400_C8BD);
    }

    #[test]
    fn humidity_divides_by_ten() {
        let frame = pack_checked(500, 0);
        assert_eq!(frame.humidity(), 50.0);
    }

    #[test]
    fn humidity_conversion_truncates() {
        let frame = pack_checked(555, 0);
        assert_eq!(frame.humidity(), 55.0);
    }

    #[test]
    fn temperature_conversion_truncates() {
        // Magnitude 255 carries 25.5C on the wire but the tenths digit is
        // dropped by the documented truncation policy.
        let frame = pack_checked(0, 0x00FF);
        assert_eq!(frame.temperature(TemperatureUnit::Celsius), 25.0);
    }

    #[test]
    fn temperature_sign_flag_negates() {
        // Sign bit set, magnitude 50 -> -5.0C
        let frame = pack_checked(0, 0x8032);
        assert_eq!(frame.temperature(TemperatureUnit::Celsius), -5.0);
    }

    #[test]
    fn temperature_fahrenheit_conversion() {
        // 20.0C -> 68.0F
        let frame = pack_checked(0, 0x00C8);
        assert_eq!(frame.temperature(TemperatureUnit::Fahrenheit), 68.0);
    }

    #[test]
    fn temperature_fahrenheit_sign_applied_after_conversion() {
        // Magnitude 50 converts to 41.0F, sign applied afterwards.
        let frame = pack_checked(0, 0x8032);
        assert_eq!(frame.temperature(TemperatureUnit::Fahrenheit), -41.0);
    }

    #[test]
    fn default_frame_is_zero() {
        let frame = Frame::default();
        assert_eq!(frame.raw(), 0);
        assert_eq!(frame.humidity(), 0.0);
        assert_eq!(frame.temperature(TemperatureUnit::Celsius), 0.0);
    }
}
