#![allow(missing_docs)]
use bilge::prelude::*;

/// Register addresses
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Temperature register address.
    Temperature,

    /// Configuration register address.
    Configuration,

    /// Low alert threshold register address.
    LowThreshold,

    /// High alert threshold register address.
    HighThreshold,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        match reg {
            Register::Temperature => 0,
            Register::Configuration => 1,
            Register::LowThreshold => 2,
            Register::HighThreshold => 3,
        }
    }
}

/// Temperature-valued register contents.
///
/// The temperature register and both alert threshold registers share
/// one encoding in extended mode: a 13-bit two's-complement value in
/// bits 15..3, 0.0625 degrees Celsius per LSB.
#[bitsize(16)]
#[derive(DebugBits, FromBits, PartialEq, Clone, Copy)]
pub struct Temperature(u16);

impl Temperature {
    /// Encode a Celsius value into register bits. Truncates toward
    /// zero below the 1/16 degree resolution of the converter.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_celsius(celsius: f32) -> Self {
        let raw = (celsius * 16.0) as i16;
        Self::from((raw as u16) << 3)
    }

    /// Sign-extended reading in units of 1/16 degree Celsius.
    #[allow(clippy::cast_possible_wrap)]
    pub fn raw(self) -> i16 {
        let shifted = self.value >> 3;
        if shifted & (1 << 12) != 0 {
            (shifted | 0xe000) as i16
        } else {
            shifted as i16
        }
    }

    /// Reading in degrees Celsius.
    pub fn celsius(self) -> f32 {
        f32::from(self.raw()) / 16.0
    }
}

/// Configuration register.
#[bitsize(16)]
#[derive(DebugBits, FromBits, PartialEq, Clone, Copy)]
pub struct Configuration {
    reserved0_3: u4,

    /// Extended mode
    pub em: bool,

    /// Alert state, device-authored
    pub al: bool,

    /// Conversion rate
    pub cr: ConversionRate,

    /// Shutdown
    pub sd: bool,

    /// Alert mode
    pub tm: AlertMode,

    /// Alert polarity
    pub pol: Polarity,

    /// Fault queue
    pub fq: FaultQueue,

    /// Converter resolution, read-only
    pub resolution: u2,

    /// One-shot trigger / conversion-ready
    pub os: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from(0b0110_0000_1010_0000)
    }
}

impl Configuration {
    /// Configure extended mode.
    #[must_use]
    pub fn with_em(mut self, em: bool) -> Self {
        self.set_em(em);
        Self::from(self.value)
    }

    /// Configure conversion rate.
    #[must_use]
    pub fn with_cr(mut self, rate: ConversionRate) -> Self {
        self.set_cr(rate);
        Self::from(self.value)
    }

    /// Configure shutdown.
    #[must_use]
    pub fn with_sd(mut self, shutdown: bool) -> Self {
        self.set_sd(shutdown);
        Self::from(self.value)
    }

    /// Configure alert mode.
    #[must_use]
    pub fn with_tm(mut self, mode: AlertMode) -> Self {
        self.set_tm(mode);
        Self::from(self.value)
    }

    /// Configure alert polarity.
    #[must_use]
    pub fn with_pol(mut self, polarity: Polarity) -> Self {
        self.set_pol(polarity);
        Self::from(self.value)
    }

    /// Configure fault queue.
    #[must_use]
    pub fn with_fq(mut self, queue: FaultQueue) -> Self {
        self.set_fq(queue);
        Self::from(self.value)
    }

    /// Configure the one-shot trigger bit.
    #[must_use]
    pub fn with_os(mut self, os: bool) -> Self {
        self.set_os(os);
        Self::from(self.value)
    }
}

/// Conversion rate.
#[bitsize(2)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum ConversionRate {
    /// 0.25Hz conversion rate.
    Hertz025,

    /// 1Hz conversion rate.
    Hertz1,

    /// 4Hz conversion rate (power-on default).
    Hertz4,

    /// 8Hz conversion rate.
    Hertz8,
}

/// Alert mode.
#[bitsize(1)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum AlertMode {
    /// Comparator mode. The alert asserts once the temperature exceeds
    /// the high threshold and releases once it drops below the low
    /// threshold.
    Comparator,

    /// Interrupt mode. The alert asserts on a threshold crossing and
    /// releases when any register is read.
    Interrupt,
}

/// Alert polarity.
#[bitsize(1)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum Polarity {
    /// Active low (default).
    ActiveLow,

    /// Active high.
    ActiveHigh,
}

/// Fault queue: consecutive out-of-threshold conversions required
/// before the alert asserts.
#[bitsize(2)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum FaultQueue {
    /// Assert after a single conversion.
    One,

    /// Assert after 2 consecutive conversions.
    Two,

    /// Assert after 4 consecutive conversions.
    Four,

    /// Assert after 6 consecutive conversions.
    Six,
}

impl From<FaultQueue> for u8 {
    fn from(queue: FaultQueue) -> Self {
        match queue {
            FaultQueue::One => 1,
            FaultQueue::Two => 2,
            FaultQueue::Four => 4,
            FaultQueue::Six => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn default_configuration() {
        let cfg = Configuration::default();
        assert_eq!(cfg.value, 0x60a0);
    }

    #[test]
    fn modify_extended_mode() {
        let cfg = Configuration::default().with_em(true);
        assert_eq!(cfg.value, 0x60b0);
    }

    #[test]
    fn modify_one_shot() {
        let cfg = Configuration::default().with_os(true);
        assert_eq!(cfg.value, 0xe0a0);
    }

    #[test]
    fn modify_shutdown() {
        let cfg = Configuration::default().with_sd(true);
        assert_eq!(cfg.value, 0x61a0);
    }

    #[test]
    fn modify_alert_mode() {
        let cfg = Configuration::default().with_tm(AlertMode::Interrupt);
        assert_eq!(cfg.value, 0x62a0);
    }

    #[test]
    fn modify_polarity() {
        let cfg = Configuration::default().with_pol(Polarity::ActiveHigh);
        assert_eq!(cfg.value, 0x64a0);
    }

    #[test]
    fn modify_fault_queue() {
        let cfg = Configuration::default().with_fq(FaultQueue::Four);
        assert_eq!(cfg.value, 0x70a0);

        let cfg = Configuration::default().with_fq(FaultQueue::Six);
        assert_eq!(cfg.value, 0x78a0);
    }

    #[test]
    fn modify_conversion_rate() {
        let cfg = Configuration::default().with_cr(ConversionRate::Hertz025);
        assert_eq!(cfg.value, 0x6020);

        let cfg = Configuration::default().with_cr(ConversionRate::Hertz8);
        assert_eq!(cfg.value, 0x60e0);
    }

    #[test]
    fn register_addresses() {
        assert_eq!(u8::from(Register::Temperature), 0x00);
        assert_eq!(u8::from(Register::Configuration), 0x01);
        assert_eq!(u8::from(Register::LowThreshold), 0x02);
        assert_eq!(u8::from(Register::HighThreshold), 0x03);
    }

    #[test]
    fn fault_queue_lengths() {
        assert_eq!(u8::from(FaultQueue::One), 1);
        assert_eq!(u8::from(FaultQueue::Two), 2);
        assert_eq!(u8::from(FaultQueue::Four), 4);
        assert_eq!(u8::from(FaultQueue::Six), 6);
    }

    #[test]
    fn decode_positive_temperature() {
        let t = Temperature::from(0x04b0);
        assert_eq!(t.raw(), 150);
        assert_approx_eq!(t.celsius(), 9.375, 1e-6);
    }

    #[test]
    fn decode_full_scale_temperature() {
        let t = Temperature::from(0x4b00);
        assert_eq!(t.raw(), 2400);
        assert_approx_eq!(t.celsius(), 150.0, 1e-6);
    }

    #[test]
    fn decode_negative_temperature() {
        let t = Temperature::from(0xf380);
        assert_eq!(t.raw(), -400);
        assert_approx_eq!(t.celsius(), -25.0, 1e-6);

        let t = Temperature::from(0xfff8);
        assert_eq!(t.raw(), -1);
        assert_approx_eq!(t.celsius(), -0.0625, 1e-6);
    }

    #[test]
    fn encode_celsius() {
        assert_eq!(Temperature::from_celsius(75.0).value, 0x2580);
        assert_eq!(Temperature::from_celsius(-25.0).value, 0xf380);
        assert_eq!(Temperature::from_celsius(0.0).value, 0x0000);
    }

    #[test]
    fn celsius_round_trip() {
        for raw in -2400i16..=2400 {
            let celsius = f32::from(raw) / 16.0;
            assert_eq!(Temperature::from_celsius(celsius).raw(), raw);
        }
    }

    #[test]
    fn register_round_trip_zeroes_low_bits() {
        for value in [0x2580, 0x2587, 0xf380, 0xf387, 0x0004] {
            let celsius = Temperature::from(value).celsius();
            assert_eq!(Temperature::from_celsius(celsius).value, value & !0x7);
        }
    }
}
