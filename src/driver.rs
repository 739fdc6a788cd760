//! Blocking driver for LTR390 ambient light and UV sensor

use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::{
    error::Error,
    field::{BitField, ByteOrder, RegisterAccess},
    register::{DEFAULT_ADDRESS, MainStatusRegister, PartIdRegister, Register},
    types::{Gain, Mode, Resolution},
};

const MAIN_CTRL: RegisterAccess = RegisterAccess::new(Register::MainCtrl);
const MEAS_RATE: RegisterAccess = RegisterAccess::new(Register::MeasRate);
const GAIN: RegisterAccess = RegisterAccess::new(Register::Gain);
const PART_ID: RegisterAccess = RegisterAccess::new(Register::PartId);
const MAIN_STATUS: RegisterAccess = RegisterAccess::new(Register::MainStatus);
const INT_CFG: RegisterAccess = RegisterAccess::new(Register::IntCfg);
const INT_PST: RegisterAccess = RegisterAccess::new(Register::IntPst);

const ALS_DATA: RegisterAccess = RegisterAccess::wide(Register::AlsData, 3, ByteOrder::LsbFirst);
const UVS_DATA: RegisterAccess = RegisterAccess::wide(Register::UvsData, 3, ByteOrder::LsbFirst);
const THRESH_UP: RegisterAccess =
    RegisterAccess::wide(Register::ThreshUp, 3, ByteOrder::LsbFirst);
const THRESH_LOW: RegisterAccess =
    RegisterAccess::wide(Register::ThreshLow, 3, ByteOrder::LsbFirst);

const ENABLE: BitField = BitField::new(MAIN_CTRL, 1, 1);
const MODE: BitField = BitField::new(MAIN_CTRL, 1, 3);
const SOFT_RESET: BitField = BitField::new(MAIN_CTRL, 1, 4);
const RESOLUTION: BitField = BitField::new(MEAS_RATE, 3, 4);
const GAIN_RANGE: BitField = BitField::new(GAIN, 3, 0);
const INT_ENABLE: BitField = BitField::new(INT_CFG, 1, 2);
const INT_SOURCE: BitField = BitField::new(INT_CFG, 2, 4);
const INT_PERSIST: BitField = BitField::new(INT_PST, 4, 4);
const DATA_READY: BitField = BitField::new(MAIN_STATUS, 1, 3);

/// Time the sensor needs to come back from a soft reset
const RESET_DELAY_MS: u32 = 10;

/// LTR390 driver instance
///
/// The driver starts uninitialized; every operation other than [`Self::begin`]
/// returns [`Error::NotInitialized`] until `begin` has succeeded.
///
/// Bitfield writes are read-modify-write sequences of two bus transactions, so
/// the driver must be the only user of the device.
#[derive(Debug)]
pub struct Ltr390<I2C, D> {
    i2c: I2C,
    delay: D,
    data_ready: Option<BitField>,
}

impl<I2C, D, E> Ltr390<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Create a new LTR390 driver instance at [`DEFAULT_ADDRESS`]
    ///
    /// No bus traffic happens until [`Self::begin`] is called.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            data_ready: None,
        }
    }

    /// Release the I2C bus and delay, consuming the driver
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Whether [`Self::begin`] has completed successfully
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.data_ready.is_some()
    }

    /// Detect, reset and enable the sensor
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the device does not acknowledge its address
    /// - the part ID is not an LTR390
    /// - the soft reset bit does not clear
    /// - the sensor does not report itself enabled afterwards
    /// - I2C communication fails
    pub fn begin(&mut self) -> Result<(), Error<E>> {
        self.data_ready = None;

        self.probe().map_err(Error::TransportUnavailable)?;

        let id = self.read_part_id()?;
        if !id.is_ltr390() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Unexpected part ID 0x{:02X}", id.0);
            return Err(Error::UnexpectedDeviceId(id.0));
        }

        self.soft_reset()?;

        self.write_field(ENABLE, 1)?;
        if self.read_field(ENABLE)? == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Sensor did not enable");
            return Err(Error::EnableFailed);
        }

        self.data_ready = Some(DATA_READY);

        #[cfg(feature = "defmt")]
        defmt::debug!("LTR390 revision {} initialized", id.revision());

        Ok(())
    }

    /// Soft reset the sensor and verify that the reset completed
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized, the reset bit does
    /// not self-clear, or I2C communication fails
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        self.soft_reset()
    }

    fn soft_reset(&mut self) -> Result<(), Error<E>> {
        let raw = self.read_register(MAIN_CTRL)?;

        // The sensor resets before acknowledging this write, so a NACK is expected
        let reset = SOFT_RESET.insert(raw, 1);
        if let Err(_e) = MAIN_CTRL.write(&mut self.i2c, DEFAULT_ADDRESS, reset) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Soft reset write not acknowledged");
        }

        self.delay.delay_ms(RESET_DELAY_MS);

        // Some I2C peripherals hang after the missing ACK until the address is
        // addressed again. Failures show up in the read below.
        if let Err(_e) = self.probe() {
            #[cfg(feature = "defmt")]
            defmt::debug!("Address probe after soft reset not acknowledged");
        }

        if self.read_field(SOFT_RESET)? != 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Soft reset bit did not clear");
            return Err(Error::ResetVerificationFailed);
        }

        Ok(())
    }

    /// Enable or disable ALS/UVS measurements
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn enable(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        self.write_field(ENABLE, u32::from(enable))
    }

    /// Check if measurements are enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn enabled(&mut self) -> Result<bool, Error<E>> {
        self.ensure_initialized()?;
        Ok(self.read_field(ENABLE)? != 0)
    }

    /// Select ambient light or UV measurements
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        self.write_field(MODE, u8::from(mode).into())
    }

    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn mode(&mut self) -> Result<Mode, Error<E>> {
        self.ensure_initialized()?;
        self.read_typed(MODE)
    }

    /// Set the analog gain range
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        self.write_field(GAIN_RANGE, u8::from(gain).into())
    }

    /// # Errors
    ///
    /// Returns an error if the driver is not initialized, I2C communication
    /// fails or the register holds a reserved gain pattern
    pub fn gain(&mut self) -> Result<Gain, Error<E>> {
        self.ensure_initialized()?;
        self.read_typed(GAIN_RANGE)
    }

    /// Set the ADC resolution, which also fixes the conversion time
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        self.write_field(RESOLUTION, u8::from(resolution).into())
    }

    /// # Errors
    ///
    /// Returns an error if the driver is not initialized, I2C communication
    /// fails or the register holds a reserved resolution pattern
    pub fn resolution(&mut self) -> Result<Resolution, Error<E>> {
        self.ensure_initialized()?;
        self.read_typed(RESOLUTION)
    }

    /// Set the interrupt thresholds
    ///
    /// Both registers are 24 bits wide; higher bits are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn set_thresholds(&mut self, lower: u32, higher: u32) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        THRESH_LOW
            .write(&mut self.i2c, DEFAULT_ADDRESS, lower)
            .map_err(Error::Communication)?;
        THRESH_UP
            .write(&mut self.i2c, DEFAULT_ADDRESS, higher)
            .map_err(Error::Communication)
    }

    /// Configure the interrupt pin
    ///
    /// `persistence` is the number of consecutive out-of-threshold samples
    /// (minus one) needed to trigger, 0 to 15; higher bits are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn config_interrupt(
        &mut self,
        enable: bool,
        source: Mode,
        persistence: u8,
    ) -> Result<(), Error<E>> {
        self.ensure_initialized()?;

        self.write_field(INT_ENABLE, u32::from(enable))?;

        let source = match source {
            Mode::Als => 0b01,
            Mode::Uvs => 0b11,
        };
        self.write_field(INT_SOURCE, source)?;

        self.write_field(INT_PERSIST, persistence.into())
    }

    /// Check if a new ALS/UVS sample is ready to be read
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn new_data_available(&mut self) -> Result<bool, Error<E>> {
        let data_ready = self.ensure_initialized()?;
        let ready = data_ready
            .read(&mut self.i2c, DEFAULT_ADDRESS)
            .map_err(Error::Communication)?;
        Ok(ready != 0)
    }

    /// Read the raw ambient light count (up to 20 bits)
    ///
    /// The data status flag is neither checked nor cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn read_als(&mut self) -> Result<u32, Error<E>> {
        self.ensure_initialized()?;
        self.read_register(ALS_DATA)
    }

    /// Read the raw UV count (up to 20 bits)
    ///
    /// The data status flag is neither checked nor cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn read_uvs(&mut self) -> Result<u32, Error<E>> {
        self.ensure_initialized()?;
        self.read_register(UVS_DATA)
    }

    /// Get the part number and revision
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn part_id(&mut self) -> Result<PartIdRegister, Error<E>> {
        self.ensure_initialized()?;
        self.read_part_id()
    }

    /// Get the main status register
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not initialized or I2C communication fails
    pub fn status(&mut self) -> Result<MainStatusRegister, Error<E>> {
        self.ensure_initialized()?;
        self.read_byte(MAIN_STATUS).map(MainStatusRegister)
    }

    fn ensure_initialized(&self) -> Result<BitField, Error<E>> {
        self.data_ready.ok_or(Error::NotInitialized)
    }

    /// Zero-length write; succeeds when the device acknowledges its address
    fn probe(&mut self) -> Result<(), E> {
        self.i2c.write(DEFAULT_ADDRESS, &[])
    }

    fn read_part_id(&mut self) -> Result<PartIdRegister, Error<E>> {
        self.read_byte(PART_ID).map(PartIdRegister)
    }

    fn read_register(&mut self, register: RegisterAccess) -> Result<u32, Error<E>> {
        register
            .read(&mut self.i2c, DEFAULT_ADDRESS)
            .map_err(Error::Communication)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn read_byte(&mut self, register: RegisterAccess) -> Result<u8, Error<E>> {
        self.read_register(register).map(|raw| raw as u8)
    }

    fn read_field(&mut self, field: BitField) -> Result<u32, Error<E>> {
        field
            .read(&mut self.i2c, DEFAULT_ADDRESS)
            .map_err(Error::Communication)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn read_typed<T: TryFrom<u8, Error = u8>>(&mut self, field: BitField) -> Result<T, Error<E>> {
        let raw = self.read_field(field)? as u8;
        T::try_from(raw).map_err(Error::InvalidFieldValue)
    }

    fn write_field(&mut self, field: BitField, value: u32) -> Result<(), Error<E>> {
        field
            .write(&mut self.i2c, DEFAULT_ADDRESS, value)
            .map_err(Error::Communication)
    }
}
