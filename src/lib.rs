#![no_std]
#![forbid(unsafe_code)]

#![doc = include_str!("../README.md")]

use core::fmt;

use embedded_hal::i2c::I2c;

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
    };
}

mod buffer;
pub mod config;
pub mod register;

pub use buffer::SampleBuffer;
pub use config::{Config, ConfigError, LedCurrent, PulseWidth, SampleRate};
pub use register::{Interrupt, Mode, Register, ADDRESS};

use register::{
    FIFO_DEPTH, FIFO_SAMPLE_LEN, MODE_KEEP_MASK, MODE_RESET, MODE_SHDN, MODE_TEMP_EN, SPO2_PW_CLEAR_MASK,
};

/// Sample buffer capacity used when none is given.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64;

/// Driver errors.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error<E> {
    /// The I2C transaction failed. Nothing is retried.
    Bus(E),
    /// A setting was not one of the device's supported values.
    /// No bus traffic happened for the failing call.
    Config(ConfigError),
}

impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "i2c bus error: {:?}", e),
            Error::Config(e) => write!(f, "{}", e),
        }
    }
}

/// Values of every named register, read in address order.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDump {
    pub entries: [(Register, u8); Register::ALL.len()],
}

impl RegisterDump {
    /// Value read from `reg`.
    pub fn get(&self, reg: Register) -> Option<u8> {
        self.entries.iter().find(|(r, _)| *r == reg).map(|&(_, v)| v)
    }
}

/// A MAX30100 sensor wrapper.
///
/// Raw red and IR samples drained from the device FIFO are kept in two
/// index-aligned buffers holding up to `N` samples each.
///
/// The driver keeps no copy of the device configuration; every query goes to the bus.
/// Register updates are read-modify-write sequences, so access from several threads
/// must be serialized around the whole driver.
pub struct MAX30100<T: I2c, const N: usize = DEFAULT_BUFFER_CAPACITY> {
    i2c: T,
    red: SampleBuffer<N>,
    ir: SampleBuffer<N>,
}

impl<T: I2c, const N: usize> MAX30100<T, N> {
    /// Constructs a MAX30100 sensor wrapper and initializes the device.
    ///
    /// The device is put in heart-rate mode, which also triggers an initial temperature conversion.
    /// The LED currents are programmed next, then the SpO2 configuration.
    /// `config.mode` is not applied here; use [`MAX30100::enable_spo2`] afterwards.
    ///
    /// Every setting is checked before the bus is touched.
    pub fn new(i2c: T, config: Config) -> Result<Self, Error<T::Error>> {
        let valid = config.validate(N)?;
        let mut dev = Self {
            i2c,
            red: SampleBuffer::new(valid.max_buffer_len),
            ir: SampleBuffer::new(valid.max_buffer_len),
        };
        dev.set_mode(Mode::HeartRate)?;
        dev.write_led_current(valid.led_red, valid.led_ir)?;
        dev.write_spo_config(valid.sample_rate, valid.pulse_width)?;
        Ok(dev)
    }

    /// Gives back the underlying bus.
    pub fn release(self) -> T {
        self.i2c
    }

    fn read_register(&mut self, reg: Register) -> Result<u8, Error<T::Error>> {
        let mut buf = [0u8];
        self.i2c.write_read(ADDRESS, &[reg as u8], &mut buf).map_err(Error::Bus)?;
        trace!("read {=u8:#x} -> {=u8:#x}", reg as u8, buf[0]);
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<T::Error>> {
        trace!("write {=u8:#x} <- {=u8:#x}", reg as u8, value);
        self.i2c.write(ADDRESS, &[reg as u8, value]).map_err(Error::Bus)
    }

    fn transform_mode_config(&mut self, trans: fn(u8) -> u8) -> Result<(), Error<T::Error>> {
        let reg = self.read_register(Register::ModeConfig)?;
        self.write_register(Register::ModeConfig, trans(reg))
    }

    /// Latest red sample, or `None` if nothing has been read yet.
    pub fn red(&self) -> Option<u16> {
        self.red.latest()
    }
    /// Latest IR sample, or `None` if nothing has been read yet.
    pub fn ir(&self) -> Option<u16> {
        self.ir.latest()
    }
    /// Buffered red samples, oldest first.
    pub fn red_samples(&self) -> &SampleBuffer<N> {
        &self.red
    }
    /// Buffered IR samples, oldest first.
    pub fn ir_samples(&self) -> &SampleBuffer<N> {
        &self.ir
    }
    /// Number of samples kept per channel.
    pub fn max_buffer_len(&self) -> usize {
        self.red.max_len()
    }

    /// Sets the drive current of both LEDs, in milliamps.
    /// Both values must come from [`LedCurrent::VALID_MA`].
    pub fn set_led_current(&mut self, red_ma: f32, ir_ma: f32) -> Result<(), Error<T::Error>> {
        let red = LedCurrent::try_from(red_ma)?;
        let ir = LedCurrent::try_from(ir_ma)?;
        self.write_led_current(red, ir)
    }

    fn write_led_current(&mut self, red: LedCurrent, ir: LedCurrent) -> Result<(), Error<T::Error>> {
        self.write_register(Register::LedConfig, (red.code() << 4) | ir.code())
    }

    /// Switches the operating mode.
    ///
    /// This is two writes, both derived from the single value read beforehand:
    /// first the value masked with `0x74`, then the value with the mode bits OR'd in.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<T::Error>> {
        let reg = self.read_register(Register::ModeConfig)?;
        self.write_register(Register::ModeConfig, reg & MODE_KEEP_MASK)?;
        self.write_register(Register::ModeConfig, reg | mode.code())
    }

    /// Sets the LED pulse width.
    ///
    /// The sample rate is checked against [`SampleRate::VALID_HZ`] but is not written
    /// to the device; only the pulse width bits of SPO2_CONFIG change.
    pub fn set_spo_config(&mut self, sample_rate_hz: u16, pulse_width_us: u16) -> Result<(), Error<T::Error>> {
        let sample_rate = SampleRate::try_from(sample_rate_hz)?;
        let pulse_width = PulseWidth::try_from(pulse_width_us)?;
        self.write_spo_config(sample_rate, pulse_width)
    }

    // TODO: encode the sample rate into SPO2_CONFIG bits 2..4 once existing users are checked against it.
    fn write_spo_config(&mut self, _sample_rate: SampleRate, pulse_width: PulseWidth) -> Result<(), Error<T::Error>> {
        let reg = self.read_register(Register::Spo2Config)?;
        self.write_register(Register::Spo2Config, (reg & SPO2_PW_CLEAR_MASK) | pulse_width.code())
    }

    /// Switches to SpO2 mode, sampling both LEDs. See [`MAX30100::set_mode`].
    pub fn enable_spo2(&mut self) -> Result<(), Error<T::Error>> {
        self.set_mode(Mode::SpO2)
    }
    /// Switches to heart-rate mode. See [`MAX30100::set_mode`].
    pub fn disable_spo2(&mut self) -> Result<(), Error<T::Error>> {
        self.set_mode(Mode::HeartRate)
    }

    /// Routes one interrupt source to the INT pin, replacing any other,
    /// then reads INT_STATUS to clear latched flags.
    pub fn enable_interrupt(&mut self, interrupt: Interrupt) -> Result<(), Error<T::Error>> {
        self.write_register(Register::IntEnable, interrupt.enable_bits())?;
        self.read_register(Register::IntStatus)?;
        Ok(())
    }

    /// Reads INT_STATUS. Reading clears the flags on the device.
    pub fn interrupt_status(&mut self) -> Result<u8, Error<T::Error>> {
        self.read_register(Register::IntStatus)
    }

    /// Number of unread samples waiting in the device FIFO.
    pub fn get_number_of_samples(&mut self) -> Result<u8, Error<T::Error>> {
        let write_ptr = self.read_register(Register::FifoWrPtr)? as i16;
        let read_ptr = self.read_register(Register::FifoRdPtr)? as i16;
        let depth = FIFO_DEPTH as i16;
        Ok(((depth + write_ptr - read_ptr).unsigned_abs() % depth as u16) as u8)
    }

    /// Number of samples lost because the FIFO was full.
    pub fn overflow_count(&mut self) -> Result<u8, Error<T::Error>> {
        self.read_register(Register::OvrflowCtr)
    }

    /// Pops one sample off the device FIFO into the red and IR buffers.
    ///
    /// Call once per available sample, see [`MAX30100::get_number_of_samples`].
    pub fn read_sensor(&mut self) -> Result<(), Error<T::Error>> {
        let mut raw = [0u8; FIFO_SAMPLE_LEN];
        self.i2c.write_read(ADDRESS, &[Register::FifoData as u8], &mut raw).map_err(Error::Bus)?;
        let ir = u16::from_be_bytes([raw[0], raw[1]]);
        let red = u16::from_be_bytes([raw[2], raw[3]]);
        trace!("sample ir={=u16} red={=u16}", ir, red);
        self.ir.push(ir);
        self.red.push(red);
        Ok(())
    }

    /// Reads every sample currently waiting in the device FIFO.
    /// Returns how many were read.
    pub fn drain_fifo(&mut self) -> Result<usize, Error<T::Error>> {
        let available = self.get_number_of_samples()?;
        for _ in 0..available {
            self.read_sensor()?;
        }
        Ok(available as usize)
    }

    /// Puts the device in power-save mode. Register contents are kept.
    pub fn shutdown(&mut self) -> Result<(), Error<T::Error>> {
        self.transform_mode_config(|x| x | MODE_SHDN)
    }
    /// Requests a power-on reset. The device clears the bit once done.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        self.transform_mode_config(|x| x | MODE_RESET)
    }
    /// Starts a single temperature conversion.
    /// Wait for the conversion (about 29 ms) before calling [`MAX30100::get_temperature`].
    pub fn refresh_temperature(&mut self) -> Result<(), Error<T::Error>> {
        self.transform_mode_config(|x| x | MODE_TEMP_EN)
    }

    /// Gets the die temperature (in Celsius) from the last conversion.
    pub fn get_temperature(&mut self) -> Result<f64, Error<T::Error>> {
        let intg = self.read_register(Register::TempIntg)? as i8;
        let frac = self.read_register(Register::TempFrac)?;
        Ok(intg as f64 + frac as f64 * 0.0625)
    }

    /// Reads the part revision.
    pub fn get_rev_id(&mut self) -> Result<u8, Error<T::Error>> {
        self.read_register(Register::RevId)
    }
    /// Reads the part ID, normally 0x11.
    pub fn get_part_id(&mut self) -> Result<u8, Error<T::Error>> {
        self.read_register(Register::PartId)
    }

    /// Reads every named register, for debugging.
    ///
    /// Note that this reads INT_STATUS and FIFO_DATA too, which clears
    /// pending interrupts and consumes a byte of the FIFO.
    pub fn get_registers(&mut self) -> Result<RegisterDump, Error<T::Error>> {
        let mut entries = Register::ALL.map(|r| (r, 0u8));
        for entry in entries.iter_mut() {
            entry.1 = self.read_register(entry.0)?;
        }
        Ok(RegisterDump { entries })
    }
}
