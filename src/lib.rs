#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod driver;
mod error;
mod field;
mod register;
mod types;

pub use driver::Ltr390;
pub use error::Error;
pub use register::{
    DEFAULT_ADDRESS, MainStatusRegister, PART_NUMBER, PartIdRegister, Register,
};
pub use types::{Gain, Mode, Resolution};
