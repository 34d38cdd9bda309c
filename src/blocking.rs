//! Tmp102 Blocking API

use super::{Add0, AlertMode, Configuration, ConversionRate, FaultQueue, Polarity, Register, Temperature};

/// Sampling mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionMode {
    /// The device converts continuously at the configured rate; reads
    /// return whatever it last sampled.
    Continuous,

    /// The device idles in shutdown and converts only when triggered.
    /// Each read triggers a conversion and blocks until it completes.
    OneShot,
}

impl Default for ConversionMode {
    fn default() -> Self {
        Self::Continuous
    }
}

/// Tmp102 Errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C Bus Error
    Bus(E),

    /// Fault queue lengths other than 1, 2, 4 or 6 are not supported.
    InvalidFaultQueueLength,

    /// A triggered conversion never signalled ready.
    ConversionTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

/// TMP102 blocking device driver
pub struct Tmp102<I2C: embedded_hal::i2c::I2c, DELAY: embedded_hal::delay::DelayNs> {
    /// The concrete I2C bus implementation
    i2c: I2C,

    /// The concrete [`embedded_hal::delay::DelayNs`] implementation
    delay: DELAY,

    /// The I2C address.
    pub(crate) addr: u8,

    /// Shadow of the device configuration register. Authoritative for
    /// fields the driver wrote; the AL and OS bits are device-authored
    /// and only valid right after a configuration read.
    config: Configuration,

    /// Register last selected through the device pointer, if known.
    pointer: Option<Register>,

    /// Current sampling mode.
    mode: ConversionMode,
}

impl<I2C: embedded_hal::i2c::I2c, DELAY: embedded_hal::delay::DelayNs> Tmp102<I2C, DELAY> {
    const CONVERSION_TIME_MS: u32 = 26;
    const READY_POLL_INTERVAL_US: u32 = 500;
    /// One further full conversion period of polling before giving up.
    const MAX_READY_POLLS: u32 = 52;

    /// Create a new TMP102 instance. Forces extended (13-bit) mode and
    /// writes the initial configuration to the device.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn new_blocking(i2c: I2C, delay: DELAY, add0: Add0) -> Result<Self, I2C::Error> {
        let mut tmp = Self {
            i2c,
            delay,
            addr: add0.into(),
            config: Configuration::default().with_em(true),
            pointer: None,
            mode: ConversionMode::Continuous,
        };
        tmp.write_config()?;
        Ok(tmp)
    }

    /// Create a new TMP102 instance with ADD0 tied to GND, resulting
    /// in an instance responding to address `0x48`.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn new_blocking_with_add0_gnd(i2c: I2C, delay: DELAY) -> Result<Self, I2C::Error> {
        Self::new_blocking(i2c, delay, Add0::Gnd)
    }

    /// Create a new TMP102 instance with ADD0 tied to V+, resulting in
    /// an instance responding to address `0x49`.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn new_blocking_with_add0_vplus(i2c: I2C, delay: DELAY) -> Result<Self, I2C::Error> {
        Self::new_blocking(i2c, delay, Add0::Vplus)
    }

    /// Create a new TMP102 instance with ADD0 tied to SDA, resulting
    /// in an instance responding to address `0x4a`.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn new_blocking_with_add0_sda(i2c: I2C, delay: DELAY) -> Result<Self, I2C::Error> {
        Self::new_blocking(i2c, delay, Add0::Sda)
    }

    /// Create a new TMP102 instance with ADD0 tied to SCL, resulting
    /// in an instance responding to address `0x4b`.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn new_blocking_with_add0_scl(i2c: I2C, delay: DELAY) -> Result<Self, I2C::Error> {
        Self::new_blocking(i2c, delay, Add0::Scl)
    }

    /// Destroy the driver instance, return the I2C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Raw temperature reading in units of 1/16 degree Celsius.
    ///
    /// In continuous mode this is a single register read. In one-shot
    /// mode it triggers a conversion, waits out the worst-case
    /// conversion time and then polls the ready bit, so the call
    /// blocks for at least 26 ms.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when an I2C transaction fails,
    /// `Error::ConversionTimeout` when a triggered conversion never
    /// signals ready
    pub fn raw_temperature(&mut self) -> Result<i16, Error<I2C::Error>> {
        if self.mode == ConversionMode::OneShot {
            self.trigger_one_shot()?;
        }
        let value = self.read_register(Register::Temperature)?;
        Ok(Temperature::from(value).raw())
    }

    /// Temperature reading in degrees Celsius.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when an I2C transaction fails,
    /// `Error::ConversionTimeout` when a triggered conversion never
    /// signals ready
    pub fn temperature(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(f32::from(self.raw_temperature()?) / 16.0)
    }

    /// Set the continuous-mode conversion rate.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_conversion_rate(&mut self, rate: ConversionRate) -> Result<(), I2C::Error> {
        self.config.set_cr(rate);
        self.write_config()
    }

    /// Conversion rate, decoded from the shadow configuration.
    pub fn conversion_rate(&self) -> ConversionRate {
        self.config.cr()
    }

    /// Set the number of consecutive out-of-threshold conversions
    /// required before the alert asserts. Lengths other than 1, 2, 4
    /// or 6 are rejected without touching the bus or the shadow
    /// configuration.
    ///
    /// # Errors
    ///
    /// `Error::InvalidFaultQueueLength` when the length is
    /// unsupported, `Error::Bus` when the I2C transaction fails
    pub fn set_fault_queue_length(&mut self, length: u8) -> Result<(), Error<I2C::Error>> {
        let queue = match length {
            1 => FaultQueue::One,
            2 => FaultQueue::Two,
            4 => FaultQueue::Four,
            6 => FaultQueue::Six,
            _ => return Err(Error::InvalidFaultQueueLength),
        };
        self.config.set_fq(queue);
        self.write_config()?;
        Ok(())
    }

    /// Fault queue length, decoded from the shadow configuration.
    pub fn fault_queue_length(&self) -> u8 {
        self.config.fq().into()
    }

    /// Set the alert mode.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_alert_mode(&mut self, mode: AlertMode) -> Result<(), I2C::Error> {
        self.config.set_tm(mode);
        self.write_config()
    }

    /// Alert mode, decoded from the shadow configuration.
    pub fn alert_mode(&self) -> AlertMode {
        self.config.tm()
    }

    /// Set the alert pin polarity.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_alert_polarity(&mut self, polarity: Polarity) -> Result<(), I2C::Error> {
        self.config.set_pol(polarity);
        self.write_config()
    }

    /// Alert polarity, decoded from the shadow configuration.
    pub fn alert_polarity(&self) -> Polarity {
        self.config.pol()
    }

    /// Set the high alert threshold in degrees Celsius.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_alert_high_temperature(&mut self, celsius: f32) -> Result<(), I2C::Error> {
        self.write_register(Register::HighThreshold, Temperature::from_celsius(celsius).into())
    }

    /// Read back the high alert threshold in degrees Celsius.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn alert_high_temperature(&mut self) -> Result<f32, I2C::Error> {
        let value = self.read_register(Register::HighThreshold)?;
        Ok(Temperature::from(value).celsius())
    }

    /// Set the low alert threshold in degrees Celsius.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_alert_low_temperature(&mut self, celsius: f32) -> Result<(), I2C::Error> {
        self.write_register(Register::LowThreshold, Temperature::from_celsius(celsius).into())
    }

    /// Read back the low alert threshold in degrees Celsius.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn alert_low_temperature(&mut self) -> Result<f32, I2C::Error> {
        let value = self.read_register(Register::LowThreshold)?;
        Ok(Temperature::from(value).celsius())
    }

    /// Enter or leave shutdown. Leaving shutdown resumes continuous
    /// conversions, so the sampling mode snaps back to
    /// [`ConversionMode::Continuous`].
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_shutdown(&mut self, shutdown: bool) -> Result<(), I2C::Error> {
        self.config.set_sd(shutdown);
        if !shutdown {
            self.mode = ConversionMode::Continuous;
        }
        self.write_config()
    }

    /// Shutdown state, decoded from the shadow configuration.
    pub fn is_shutdown(&self) -> bool {
        self.config.sd()
    }

    /// Switch between continuous and one-shot sampling. One-shot keeps
    /// the device shut down between triggered conversions.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn set_conversion_mode(&mut self, mode: ConversionMode) -> Result<(), I2C::Error> {
        self.set_shutdown(mode == ConversionMode::OneShot)?;
        self.mode = mode;
        Ok(())
    }

    /// Current sampling mode.
    pub fn conversion_mode(&self) -> ConversionMode {
        self.mode
    }

    /// Alert state corrected for the configured polarity. Re-reads the
    /// configuration register.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn has_alert(&mut self) -> Result<bool, I2C::Error> {
        let pin = self.alert_pin()?;
        Ok(match self.config.pol() {
            Polarity::ActiveHigh => pin,
            Polarity::ActiveLow => !pin,
        })
    }

    /// Raw AL bit. Re-reads the configuration register, refreshing the
    /// device-authored bits in the shadow.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub fn alert_pin(&mut self) -> Result<bool, I2C::Error> {
        self.read_config()?;
        Ok(self.config.al())
    }

    fn trigger_one_shot(&mut self) -> Result<(), Error<I2C::Error>> {
        self.config.set_os(true);
        self.write_config()?;
        self.delay.delay_ms(Self::CONVERSION_TIME_MS);
        for _ in 0..Self::MAX_READY_POLLS {
            self.read_config()?;
            if self.config.os() {
                return Ok(());
            }
            self.delay.delay_us(Self::READY_POLL_INTERVAL_US);
        }
        Err(Error::ConversionTimeout)
    }

    fn read_config(&mut self) -> Result<(), I2C::Error> {
        let value = self.read_register(Register::Configuration)?;
        self.config = Configuration::from(value);
        Ok(())
    }

    fn write_config(&mut self) -> Result<(), I2C::Error> {
        self.write_register(Register::Configuration, self.config.into())
    }

    fn read_register(&mut self, reg: Register) -> Result<u16, I2C::Error> {
        let mut bytes = [0; 2];
        if self.pointer == Some(reg) {
            self.i2c.read(self.addr, &mut bytes)?;
        } else {
            self.pointer = None;
            self.i2c.write_read(self.addr, &[reg.into()], &mut bytes)?;
            self.pointer = Some(reg);
        }
        Ok(u16::from_be_bytes(bytes))
    }

    fn write_register(&mut self, reg: Register, value: u16) -> Result<(), I2C::Error> {
        let mut data = [0; 3];

        data[0] = reg.into();
        data[1..].copy_from_slice(&value.to_be_bytes());

        // Pointer state is unknown while the transaction is in flight.
        self.pointer = None;
        self.i2c.write(self.addr, &data)?;
        self.pointer = Some(reg);
        Ok(())
    }
}
