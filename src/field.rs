//! Register and bitfield accessors over an I2C bus.
//!
//! Both types are `const` descriptors: they hold no bus handle, and the bus is
//! borrowed only for the duration of a single `read` or `write`.

use embedded_hal::i2c::I2c;

use crate::register::Register;

/// Order in which the bytes of a multi-byte register appear on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum ByteOrder {
    /// Most significant byte at the lowest address
    MsbFirst,
    /// Least significant byte at the lowest address
    LsbFirst,
}

impl ByteOrder {
    /// Assemble up to four bytes into an integer
    #[must_use]
    pub fn assemble(self, bytes: &[u8]) -> u32 {
        let fold = |acc: u32, &b: &u8| (acc << 8) | u32::from(b);
        match self {
            Self::MsbFirst => bytes.iter().fold(0, fold),
            Self::LsbFirst => bytes.iter().rev().fold(0, fold),
        }
    }

    /// Split the low `buf.len()` bytes of `value` into `buf`
    #[allow(clippy::cast_possible_truncation)]
    pub fn split(self, value: u32, buf: &mut [u8]) {
        let width = buf.len();
        for (i, byte) in buf.iter_mut().enumerate() {
            let shift = match self {
                Self::MsbFirst => width - 1 - i,
                Self::LsbFirst => i,
            };
            *byte = (value >> (8 * shift)) as u8;
        }
    }
}

/// A register of 1 to 3 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RegisterAccess {
    address: Register,
    width: usize,
    order: ByteOrder,
}

impl RegisterAccess {
    const MAX_WIDTH: usize = 3;

    /// Single byte register
    pub const fn new(address: Register) -> Self {
        Self::wide(address, 1, ByteOrder::MsbFirst)
    }

    pub const fn wide(address: Register, width: usize, order: ByteOrder) -> Self {
        assert!(width >= 1 && width <= Self::MAX_WIDTH);
        Self {
            address,
            width,
            order,
        }
    }

    pub const fn width_bits(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)]
        let bits = (self.width * 8) as u8;
        bits
    }

    pub fn read<I: I2c>(&self, i2c: &mut I, device: u8) -> Result<u32, I::Error> {
        let mut buf = [0u8; Self::MAX_WIDTH];
        let buf = &mut buf[..self.width];
        i2c.write_read(device, &[u8::from(self.address)], buf)?;

        let value = self.order.assemble(buf);

        #[cfg(feature = "defmt")]
        defmt::trace!("Read 0x{:06X} from register {}", value, self.address);

        Ok(value)
    }

    /// Write `value` in one transaction, discarding bytes above the register width
    pub fn write<I: I2c>(&self, i2c: &mut I, device: u8, value: u32) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Writing 0x{:06X} to register {}", value, self.address);

        let mut frame = [0u8; 1 + Self::MAX_WIDTH];
        frame[0] = u8::from(self.address);
        self.order.split(value, &mut frame[1..=self.width]);
        i2c.write(device, &frame[..=self.width])
    }
}

/// `bits` wide field starting at bit `shift` of a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BitField {
    register: RegisterAccess,
    bits: u8,
    shift: u8,
}

impl BitField {
    pub const fn new(register: RegisterAccess, bits: u8, shift: u8) -> Self {
        assert!(bits >= 1 && bits + shift <= register.width_bits());
        Self {
            register,
            bits,
            shift,
        }
    }

    /// Field mask in register position
    #[allow(clippy::cast_lossless)]
    pub const fn mask(&self) -> u32 {
        (u32::MAX >> (32 - self.bits as u32)) << self.shift
    }

    pub const fn extract(&self, raw: u32) -> u32 {
        (raw & self.mask()) >> self.shift
    }

    /// Replace the field inside `raw`, keeping every bit outside it
    pub const fn insert(&self, raw: u32, value: u32) -> u32 {
        (raw & !self.mask()) | ((value << self.shift) & self.mask())
    }

    pub fn read<I: I2c>(&self, i2c: &mut I, device: u8) -> Result<u32, I::Error> {
        self.register
            .read(i2c, device)
            .map(|raw| self.extract(raw))
    }

    /// Read-modify-write; not atomic against other bus masters
    pub fn write<I: I2c>(&self, i2c: &mut I, device: u8, value: u32) -> Result<(), I::Error> {
        let raw = self.register.read(i2c, device)?;
        self.register.write(i2c, device, self.insert(raw, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BYTE: RegisterAccess = RegisterAccess::new(Register::Gain);

    #[test]
    fn lsb_first_assembles_little_endian() {
        assert_eq!(ByteOrder::LsbFirst.assemble(&[0x12, 0x34, 0x02]), 0x02_3412);
        assert_eq!(ByteOrder::MsbFirst.assemble(&[0x12, 0x34, 0x02]), 0x12_3402);
        assert_eq!(ByteOrder::LsbFirst.assemble(&[0xAB]), 0xAB);
    }

    #[test]
    fn split_drops_bytes_above_width() {
        let mut buf = [0u8; 3];
        ByteOrder::LsbFirst.split(0xFF12_3456, &mut buf);
        assert_eq!(buf, [0x56, 0x34, 0x12]);

        ByteOrder::MsbFirst.split(0xFF12_3456, &mut buf);
        assert_eq!(buf, [0x12, 0x34, 0x56]);
    }

    #[test]
    fn masks() {
        assert_eq!(BitField::new(BYTE, 1, 3).mask(), 0b0000_1000);
        assert_eq!(BitField::new(BYTE, 3, 4).mask(), 0b0111_0000);
        assert_eq!(BitField::new(BYTE, 8, 0).mask(), 0xFF);
    }

    #[test]
    fn insert_then_extract_preserves_other_bits() {
        let patterns = [0x00u32, 0xFF, 0xA5, 0x5A, 0x3C];

        for bits in 1..=8u8 {
            for shift in 0..=(8 - bits) {
                let field = BitField::new(BYTE, bits, shift);
                let value_mask = (1u32 << bits) - 1;

                for &raw in &patterns {
                    for value in [0u32, 1, 0x5, 0xFF, 0x1234] {
                        let written = field.insert(raw, value);

                        assert_eq!(field.extract(written), value & value_mask);
                        assert_eq!(written & !field.mask(), raw & !field.mask());
                        assert_eq!(written & !0xFF, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn field_in_wide_register() {
        let reg = RegisterAccess::wide(Register::AlsData, 3, ByteOrder::LsbFirst);
        let field = BitField::new(reg, 4, 16);
        assert_eq!(field.extract(0x0F_0000), 0xF);
        assert_eq!(field.insert(0x01_2345, 0xA), 0x0A_2345);
    }
}
