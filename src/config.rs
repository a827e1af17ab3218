//! Enumerated device settings and their register encodings.

use core::fmt;

use crate::register::Mode;

/// A setting that was not one of the values supported by the device.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    SampleRate(u16),
    PulseWidth(u16),
    LedCurrent(f32),
    /// Requested buffer length and the compile-time capacity.
    BufferLength { requested: usize, capacity: usize },
}

fn write_valid<T: fmt::Display>(f: &mut fmt::Formatter<'_>, valid: &[T]) -> fmt::Result {
    for (i, v) in valid.iter().enumerate() {
        if i != 0 { f.write_str(", ")?; }
        write!(f, "{}", v)?;
    }
    Ok(())
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigError::SampleRate(v) => {
                write!(f, "sample rate {} Hz not valid, use one of: ", v)?;
                write_valid(f, &SampleRate::VALID_HZ)
            }
            ConfigError::PulseWidth(v) => {
                write!(f, "pulse width {} us not valid, use one of: ", v)?;
                write_valid(f, &PulseWidth::VALID_US)
            }
            ConfigError::LedCurrent(v) => {
                write!(f, "LED current {} mA not valid, use one of: ", v)?;
                write_valid(f, &LedCurrent::VALID_MA)
            }
            ConfigError::BufferLength { requested, capacity } => {
                write!(f, "buffer length {} not valid, use 1 to {}", requested, capacity)
            }
        }
    }
}

/// ADC sample rate.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SampleRate {
    Hz50   = 0,
    Hz100  = 1,
    Hz167  = 2,
    Hz200  = 3,
    Hz400  = 4,
    Hz600  = 5,
    Hz800  = 6,
    Hz1000 = 7,
}

impl SampleRate {
    const ALL: [SampleRate; 8] = [
        SampleRate::Hz50, SampleRate::Hz100, SampleRate::Hz167, SampleRate::Hz200,
        SampleRate::Hz400, SampleRate::Hz600, SampleRate::Hz800, SampleRate::Hz1000,
    ];
    /// Supported rates in Hz, indexed by register code.
    pub const VALID_HZ: [u16; 8] = [50, 100, 167, 200, 400, 600, 800, 1000];

    /// Register code of the rate.
    pub fn code(self) -> u8 { self as u8 }
    /// The rate in Hz.
    pub fn hz(self) -> u16 { Self::VALID_HZ[self as usize] }
}

impl TryFrom<u16> for SampleRate {
    type Error = ConfigError;
    fn try_from(hz: u16) -> Result<Self, ConfigError> {
        Self::VALID_HZ.iter().position(|&v| v == hz)
            .map(|i| Self::ALL[i])
            .ok_or(ConfigError::SampleRate(hz))
    }
}

/// LED pulse width, which also sets the ADC resolution.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PulseWidth {
    Us200  = 0,
    Us400  = 1,
    Us800  = 2,
    Us1600 = 3,
}

impl PulseWidth {
    const ALL: [PulseWidth; 4] = [PulseWidth::Us200, PulseWidth::Us400, PulseWidth::Us800, PulseWidth::Us1600];
    /// Supported widths in microseconds, indexed by register code.
    pub const VALID_US: [u16; 4] = [200, 400, 800, 1600];

    /// Register code of the width.
    pub fn code(self) -> u8 { self as u8 }
    /// The width in microseconds.
    pub fn micros(self) -> u16 { Self::VALID_US[self as usize] }
}

impl TryFrom<u16> for PulseWidth {
    type Error = ConfigError;
    fn try_from(us: u16) -> Result<Self, ConfigError> {
        Self::VALID_US.iter().position(|&v| v == us)
            .map(|i| Self::ALL[i])
            .ok_or(ConfigError::PulseWidth(us))
    }
}

/// LED drive current. Variant names read as milliamps, `Ma4_4` being 4.4 mA.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LedCurrent {
    Ma0    = 0,
    Ma4_4  = 1,
    Ma7_6  = 2,
    Ma11_0 = 3,
    Ma14_2 = 4,
    Ma17_4 = 5,
    Ma20_8 = 6,
    Ma24_0 = 7,
    Ma27_1 = 8,
    Ma30_6 = 9,
    Ma33_8 = 10,
    Ma37_0 = 11,
    Ma40_2 = 12,
    Ma43_6 = 13,
    Ma46_8 = 14,
    Ma50_0 = 15,
}

impl LedCurrent {
    const ALL: [LedCurrent; 16] = [
        LedCurrent::Ma0, LedCurrent::Ma4_4, LedCurrent::Ma7_6, LedCurrent::Ma11_0,
        LedCurrent::Ma14_2, LedCurrent::Ma17_4, LedCurrent::Ma20_8, LedCurrent::Ma24_0,
        LedCurrent::Ma27_1, LedCurrent::Ma30_6, LedCurrent::Ma33_8, LedCurrent::Ma37_0,
        LedCurrent::Ma40_2, LedCurrent::Ma43_6, LedCurrent::Ma46_8, LedCurrent::Ma50_0,
    ];
    /// Supported currents in milliamps, indexed by register code.
    pub const VALID_MA: [f32; 16] = [
        0.0, 4.4, 7.6, 11.0, 14.2, 17.4, 20.8, 24.0,
        27.1, 30.6, 33.8, 37.0, 40.2, 43.6, 46.8, 50.0,
    ];

    /// 4-bit register code of the current.
    pub fn code(self) -> u8 { self as u8 }
    /// The current in milliamps.
    pub fn milliamps(self) -> f32 { Self::VALID_MA[self as usize] }
}

impl TryFrom<f32> for LedCurrent {
    type Error = ConfigError;
    /// Only exact table values are accepted; nothing is rounded.
    fn try_from(ma: f32) -> Result<Self, ConfigError> {
        Self::VALID_MA.iter().position(|&v| v == ma)
            .map(|i| Self::ALL[i])
            .ok_or(ConfigError::LedCurrent(ma))
    }
}

/// Settings applied when the driver is constructed.
///
/// Values are given in physical units and checked against the device tables
/// before any bus traffic happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Accepted but not applied by [`MAX30100::new`](crate::MAX30100::new),
    /// which always leaves the device in heart-rate mode.
    pub mode: Mode,
    pub sample_rate_hz: u16,
    pub led_current_red_ma: f32,
    pub led_current_ir_ma: f32,
    pub pulse_width_us: u16,
    /// Number of most recent samples kept per channel.
    /// `None` keeps as many as the driver's buffer capacity allows.
    pub max_buffer_len: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::HeartRate,
            sample_rate_hz: 100,
            led_current_red_ma: 11.0,
            led_current_ir_ma: 11.0,
            pulse_width_us: 1600,
            max_buffer_len: None,
        }
    }
}

/// A [`Config`] whose table values have all been looked up.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Validated {
    pub sample_rate: SampleRate,
    pub led_red: LedCurrent,
    pub led_ir: LedCurrent,
    pub pulse_width: PulseWidth,
    pub max_buffer_len: usize,
}

impl Config {
    pub(crate) fn validate(&self, capacity: usize) -> Result<Validated, ConfigError> {
        let max_buffer_len = match self.max_buffer_len {
            None => capacity,
            Some(n) if n == 0 || n > capacity => return Err(ConfigError::BufferLength { requested: n, capacity }),
            Some(n) => n,
        };
        Ok(Validated {
            sample_rate: SampleRate::try_from(self.sample_rate_hz)?,
            led_red: LedCurrent::try_from(self.led_current_red_ma)?,
            led_ir: LedCurrent::try_from(self.led_current_ir_ma)?,
            pulse_width: PulseWidth::try_from(self.pulse_width_us)?,
            max_buffer_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_map_to_codes() {
        assert_eq!(PulseWidth::try_from(200).map(PulseWidth::code), Ok(0));
        assert_eq!(PulseWidth::try_from(1600).map(PulseWidth::code), Ok(3));
        assert_eq!(SampleRate::try_from(167).map(SampleRate::code), Ok(2));
        assert_eq!(SampleRate::try_from(1000).map(SampleRate::code), Ok(7));
        assert_eq!(LedCurrent::try_from(0.0).map(LedCurrent::code), Ok(0));
        assert_eq!(LedCurrent::try_from(27.1).map(LedCurrent::code), Ok(8));
        assert_eq!(LedCurrent::try_from(50.0).map(LedCurrent::code), Ok(15));

        for (i, ma) in LedCurrent::VALID_MA.iter().enumerate() {
            assert_eq!(LedCurrent::try_from(*ma).map(LedCurrent::code), Ok(i as u8));
        }
        assert_eq!(SampleRate::Hz600.hz(), 600);
        assert_eq!(PulseWidth::Us800.micros(), 800);
        assert_eq!(LedCurrent::Ma43_6.milliamps(), 43.6);
    }

    #[test]
    fn values_off_the_table_are_rejected() {
        assert_eq!(PulseWidth::try_from(300), Err(ConfigError::PulseWidth(300)));
        assert_eq!(SampleRate::try_from(0), Err(ConfigError::SampleRate(0)));
        assert_eq!(LedCurrent::try_from(11.1), Err(ConfigError::LedCurrent(11.1)));
        assert_eq!(LedCurrent::try_from(-4.4), Err(ConfigError::LedCurrent(-4.4)));
    }

    #[test]
    fn default_config_validates() {
        let v = Config::default().validate(64).unwrap();
        assert_eq!(v.sample_rate, SampleRate::Hz100);
        assert_eq!(v.led_red, LedCurrent::Ma11_0);
        assert_eq!(v.led_ir, LedCurrent::Ma11_0);
        assert_eq!(v.pulse_width, PulseWidth::Us1600);
        assert_eq!(v.max_buffer_len, 64);
    }

    #[test]
    fn buffer_length_bounds() {
        let cfg = Config { max_buffer_len: Some(0), ..Config::default() };
        assert_eq!(cfg.validate(8).unwrap_err(), ConfigError::BufferLength { requested: 0, capacity: 8 });
        let cfg = Config { max_buffer_len: Some(9), ..Config::default() };
        assert!(cfg.validate(8).is_err());
        let cfg = Config { max_buffer_len: Some(8), ..Config::default() };
        assert_eq!(cfg.validate(8).unwrap().max_buffer_len, 8);
    }
}
