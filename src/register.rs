//! Register addresses for LTR390 sensor.

/// I2C address of the LTR390 (fixed, not strappable)
pub const DEFAULT_ADDRESS: u8 = 0x53;

/// Part number reported in the upper nibble of [`Register::PartId`]
pub const PART_NUMBER: u8 = 0xB;

/// Register addresses for LTR390
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum Register {
    /// Operation mode control, software reset
    MainCtrl = 0x00,
    /// ALS/UVS measurement rate and resolution
    MeasRate = 0x04,
    /// ALS/UVS analog gain range
    Gain = 0x05,
    /// Part number and revision ID
    PartId = 0x06,
    /// Power-on, interrupt and data status
    MainStatus = 0x07,

    /// ALS ADC measurement data, lowest byte (3 bytes, LSB first)
    AlsData = 0x0D,
    /// UVS ADC measurement data, lowest byte (3 bytes, LSB first)
    UvsData = 0x10,

    /// Interrupt configuration
    IntCfg = 0x19,
    /// Interrupt persist setting
    IntPst = 0x1A,
    /// Upper interrupt threshold, lowest byte (3 bytes, LSB first)
    ThreshUp = 0x21,
    /// Lower interrupt threshold, lowest byte (3 bytes, LSB first)
    ThreshLow = 0x24,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

bitfield::bitfield! {
    /// PART_ID
    pub struct PartIdRegister(u8);
    impl Debug;
    u8;
    /// Part number ID, `0xB` for the LTR390
    pub part_number, _: 7, 4;
    /// Revision ID
    pub revision, _: 3, 0;
}

impl PartIdRegister {
    /// Check if the part number identifies an LTR390
    #[must_use]
    #[inline(always)]
    pub fn is_ltr390(&self) -> bool {
        self.part_number() == PART_NUMBER
    }
}

bitfield::bitfield! {
    /// MAIN_STATUS
    pub struct MainStatusRegister(u8);
    impl Debug;
    u8;
    /// Power-on status: set after power up or a brown-out until read
    pub power_on_status, _: 5;
    /// Interrupt status: interrupt condition triggered
    pub interrupt_status, _: 4;
    /// ALS/UVS data status
    ///
    /// - `0` = old data, already read
    /// - `1` = new data, not yet read
    pub data_status, _: 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_id_splits_nibbles() {
        let id = PartIdRegister(0xB2);
        assert_eq!(id.part_number(), 0xB);
        assert_eq!(id.revision(), 0x2);
        assert!(id.is_ltr390());

        assert!(!PartIdRegister(0xA2).is_ltr390());
    }

    #[test]
    fn main_status_flags() {
        let status = MainStatusRegister(0b0010_1000);
        assert!(status.power_on_status());
        assert!(!status.interrupt_status());
        assert!(status.data_status());
    }
}
