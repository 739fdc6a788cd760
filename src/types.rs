//! Typed values for the LTR390 configuration fields.

/// Which channel the sensor measures; also selects the interrupt source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Ambient light
    Als = 0,
    /// Ultraviolet
    Uvs = 1,
}

/// Analog gain range for ALS and UVS
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Gain {
    X1 = 0,
    X3 = 1,
    X6 = 2,
    X9 = 3,
    X18 = 4,
}

impl Gain {
    /// Multiplication factor of this range
    #[must_use]
    pub const fn factor(self) -> u8 {
        match self {
            Self::X1 => 1,
            Self::X3 => 3,
            Self::X6 => 6,
            Self::X9 => 9,
            Self::X18 => 18,
        }
    }
}

/// ADC resolution; higher resolution means slower conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Resolution {
    Bits20 = 0,
    Bits19 = 1,
    Bits18 = 2,
    Bits17 = 3,
    Bits16 = 4,
    Bits13 = 5,
}

impl Resolution {
    /// Number of significant bits in a sample
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits20 => 20,
            Self::Bits19 => 19,
            Self::Bits18 => 18,
            Self::Bits17 => 17,
            Self::Bits16 => 16,
            Self::Bits13 => 13,
        }
    }

    /// Conversion time of one sample in microseconds
    #[must_use]
    pub const fn conversion_time_us(self) -> u32 {
        match self {
            Self::Bits20 => 400_000,
            Self::Bits19 => 200_000,
            Self::Bits18 => 100_000,
            Self::Bits17 => 50_000,
            Self::Bits16 => 25_000,
            Self::Bits13 => 12_500,
        }
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> u8 {
        mode as u8
    }
}

impl From<Gain> for u8 {
    fn from(gain: Gain) -> u8 {
        gain as u8
    }
}

impl From<Resolution> for u8 {
    fn from(res: Resolution) -> u8 {
        res as u8
    }
}

impl TryFrom<u8> for Mode {
    /// The reserved raw value
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Als),
            1 => Ok(Self::Uvs),
            _ => Err(raw),
        }
    }
}

impl TryFrom<u8> for Gain {
    /// The reserved raw value
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::X1),
            1 => Ok(Self::X3),
            2 => Ok(Self::X6),
            3 => Ok(Self::X9),
            4 => Ok(Self::X18),
            _ => Err(raw),
        }
    }
}

impl TryFrom<u8> for Resolution {
    /// The reserved raw value
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Bits20),
            1 => Ok(Self::Bits19),
            2 => Ok(Self::Bits18),
            3 => Ok(Self::Bits17),
            4 => Ok(Self::Bits16),
            5 => Ok(Self::Bits13),
            _ => Err(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_encodings_are_ordinals() {
        let gains = [Gain::X1, Gain::X3, Gain::X6, Gain::X9, Gain::X18];
        for (i, gain) in gains.into_iter().enumerate() {
            let raw = u8::try_from(i).unwrap();
            assert_eq!(u8::from(gain), raw);
            assert_eq!(Gain::try_from(raw), Ok(gain));
        }
        assert_eq!(Gain::try_from(5), Err(5));
    }

    #[test]
    fn resolution_rejects_reserved_patterns() {
        assert_eq!(Resolution::try_from(5), Ok(Resolution::Bits13));
        assert_eq!(Resolution::try_from(6), Err(6));
        assert_eq!(Resolution::try_from(7), Err(7));
    }

    #[test]
    fn slower_resolutions_take_longer() {
        assert!(Resolution::Bits20 < Resolution::Bits13);
        assert!(Resolution::Bits20.conversion_time_us() > Resolution::Bits13.conversion_time_us());
        assert_eq!(Resolution::Bits18.bits(), 18);
        assert_eq!(Gain::X18.factor(), 18);
    }
}
