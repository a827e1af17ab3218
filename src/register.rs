//! Register map of the MAX30100.

/// I2C address of the device. It is not configurable.
pub const ADDRESS: u8 = 0x57;

/// Named register addresses.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// Which interrupts are tripped. Cleared on read.
    IntStatus  = 0x00,
    /// Which interrupts are active.
    IntEnable  = 0x01,
    FifoWrPtr  = 0x02,
    /// Number of samples lost to a full FIFO.
    OvrflowCtr = 0x03,
    FifoRdPtr  = 0x04,
    FifoData   = 0x05,
    ModeConfig = 0x06,
    Spo2Config = 0x07,
    LedConfig  = 0x09,
    TempIntg   = 0x16,
    TempFrac   = 0x17,
    RevId      = 0xFE,
    /// Part ID, normally 0x11.
    PartId     = 0xFF,
}

impl Register {
    /// Every named register, in address order.
    pub const ALL: [Register; 13] = [
        Register::IntStatus,
        Register::IntEnable,
        Register::FifoWrPtr,
        Register::OvrflowCtr,
        Register::FifoRdPtr,
        Register::FifoData,
        Register::ModeConfig,
        Register::Spo2Config,
        Register::LedConfig,
        Register::TempIntg,
        Register::TempFrac,
        Register::RevId,
        Register::PartId,
    ];

    /// The datasheet name of the register.
    pub fn name(self) -> &'static str {
        match self {
            Register::IntStatus  => "INT_STATUS",
            Register::IntEnable  => "INT_ENABLE",
            Register::FifoWrPtr  => "FIFO_WR_PTR",
            Register::OvrflowCtr => "OVRFLOW_CTR",
            Register::FifoRdPtr  => "FIFO_RD_PTR",
            Register::FifoData   => "FIFO_DATA",
            Register::ModeConfig => "MODE_CONFIG",
            Register::Spo2Config => "SPO2_CONFIG",
            Register::LedConfig  => "LED_CONFIG",
            Register::TempIntg   => "TEMP_INTG",
            Register::TempFrac   => "TEMP_FRAC",
            Register::RevId      => "REV_ID",
            Register::PartId     => "PART_ID",
        }
    }
}

/// Number of slots in the on-device sample FIFO.
pub const FIFO_DEPTH: u8 = 16;

/// Bytes per FIFO entry: 16-bit IR followed by 16-bit red.
pub const FIFO_SAMPLE_LEN: usize = 4;

pub(crate) const MODE_SHDN: u8 = 0x80;
pub(crate) const MODE_RESET: u8 = 0x40;
pub(crate) const MODE_TEMP_EN: u8 = 1 << 3;
pub(crate) const MODE_KEEP_MASK: u8 = 0x74;
pub(crate) const SPO2_PW_CLEAR_MASK: u8 = 0xFC;

/// Interrupt sources that can be routed to the INT pin.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Interrupt {
    SpO2        = 0,
    HeartRate   = 1,
    Temperature = 2,
    Fifo        = 3,
}

impl Interrupt {
    /// Value written to INT_ENABLE to select this source.
    pub fn enable_bits(self) -> u8 {
        (self as u8 + 1) << 4
    }
}

/// Operating mode of the device.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Mode {
    /// Only the IR LED is sampled.
    #[default]
    HeartRate = 0x02,
    /// Both red and IR LEDs are sampled.
    SpO2      = 0x03,
}

impl Mode {
    /// Mode bits of MODE_CONFIG.
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_enable_bits() {
        assert_eq!(Interrupt::SpO2.enable_bits(), 0x10);
        assert_eq!(Interrupt::HeartRate.enable_bits(), 0x20);
        assert_eq!(Interrupt::Temperature.enable_bits(), 0x30);
        assert_eq!(Interrupt::Fifo.enable_bits(), 0x40);
    }

    #[test]
    fn register_map_is_sorted() {
        assert!(Register::ALL.windows(2).all(|w| (w[0] as u8) < (w[1] as u8)));
        assert_eq!(Register::LedConfig as u8, 0x09);
        assert_eq!(Register::PartId.name(), "PART_ID");
    }
}
