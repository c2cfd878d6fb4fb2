//! High-level driver API for the AK8963 behind an MPU-9250
//!
//! The AK8963 is reached through the host's I2C master. Every magnetometer
//! register access is a slave 0 transaction: the driver programs the target
//! address, register and data (or length) into the host, then waits for the
//! host to clock the transaction on the auxiliary bus. Reads land in the host's
//! `EXT_SENS_DATA` staging registers.
//!
//! The host runs these transactions on its own schedule and exposes no
//! completion flag for slave 0, so every relayed access is followed by a fixed
//! settle wait taken from the resolved configuration.

use device_driver::RegisterInterface;

use crate::calibration::{CalibrationStore, CalibrationValues};
use crate::config::{EffectiveParameters, MagConfig, MagSettings, TimingSafety};
use crate::init::{InitError, InitState, InitStep};
use crate::magnetometer::{
    AK8963_CNTL2_SRST, AK8963_I2C_ADDRESS, AK8963_MODE_FUSE_ROM, AK8963_REG_ASAX,
    AK8963_REG_CNTL1, AK8963_REG_CNTL2, AK8963_REG_ST1, AK8963_REG_WIA, AK8963_WIA_VALUE,
    MagMode, MagStatus, RawSample, SAMPLE_DATA_OFFSET, SAMPLE_POLL_LEN, ScaledSample,
    cntl1_value,
};
use crate::registers::{EXT_SENS_DATA_00, I2C_MST_CLK_400KHZ, Mpu9250 as RegisterDevice};
use crate::scaling::scale_sample;
use crate::{Error, WHO_AM_I_MPU9250, WHO_AM_I_MPU9255};

/// Number of ASA trim bytes (ASAX, ASAY, ASAZ)
const TRIM_LEN: u8 = 3;

/// Main AK8963 driver
///
/// Owns the host transport, the initialization state and the calibration of
/// the current session. All bus access goes through `&mut self`; share the
/// driver across contexts behind a lock.
pub struct Ak8963Driver<I> {
    device: RegisterDevice<I>,
    state: InitState,
    params: Option<EffectiveParameters>,
    calibration: CalibrationStore,
}

impl<I> Ak8963Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new driver instance
    ///
    /// No bus traffic happens here. Call [`verify_host`](Self::verify_host) to
    /// check the host identity and [`initialize`](Self::initialize) to bring up
    /// the magnetometer.
    pub fn new(interface: I) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            state: InitState::Idle,
            params: None,
            calibration: CalibrationStore::new(),
        }
    }

    /// Read the host `WHO_AM_I` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the host fails.
    pub fn read_host_who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.device.who_am_i().read()?.who_am_i())
    }

    /// Check that the host is an MPU-9250 or MPU-9255
    ///
    /// Returns the identity byte on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] for any other identity, or a bus error.
    pub fn verify_host(&mut self) -> Result<u8, Error<I::Error>> {
        let who_am_i = self.read_host_who_am_i()?;
        match who_am_i {
            WHO_AM_I_MPU9250 | WHO_AM_I_MPU9255 => Ok(who_am_i),
            other => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Unexpected host WHO_AM_I: 0x{:02X}", other);
                Err(Error::InvalidDevice(other))
            }
        }
    }

    /// Read the AK8963 `WIA` register through the relay
    ///
    /// Standalone check, not part of [`initialize`](Self::initialize). Prepares
    /// the host relay if needed and waits the read delay of the current
    /// session, or the default read delay before one exists. A `Ready` session
    /// gets its sample polling reprogrammed afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the host fails.
    pub fn read_mag_who_am_i<D>(&mut self, delay: &mut D) -> Result<u8, Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        let read_delay_ms = self
            .params
            .map_or(MagSettings::default().read_delay_ms, |params| {
                params.read_delay_ms()
            });

        self.prepare_relay()?;
        self.relay_read_request(AK8963_REG_WIA, 1)?;
        delay.delay_ms(read_delay_ms);

        let mut wia = [0u8; 1];
        self.read_staged(&mut wia)?;

        if let (InitState::Ready, Some(params)) = (self.state, self.params) {
            self.configure_sample_poll(params.sample_rate_divider())?;
        }

        Ok(wia[0])
    }

    /// Check that the relay reaches an AK8963
    ///
    /// Returns the `WIA` byte on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMagnetometer`] for any other identity, or a bus
    /// error.
    pub fn verify_magnetometer<D>(&mut self, delay: &mut D) -> Result<u8, Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        match self.read_mag_who_am_i(delay)? {
            AK8963_WIA_VALUE => Ok(AK8963_WIA_VALUE),
            other => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Unexpected AK8963 WIA: 0x{:02X}", other);
                Err(Error::InvalidMagnetometer(other))
            }
        }
    }

    /// Bring up the magnetometer
    ///
    /// Resolves `config`, then runs the full sequence: reset, power-down, fuse
    /// ROM access, calibration read, power-down, mode selection and continuous
    /// polling setup. On success the session is `Ready` and the new
    /// calibration is returned.
    ///
    /// Every call starts from `Idle`. A rejected configuration causes no bus
    /// traffic and leaves the previous session untouched; once the sequence
    /// starts, the previous calibration is discarded.
    ///
    /// **Timing**: waits `write_delay_ms` after each of the six relayed writes
    /// and `read_delay_ms` after the calibration read request.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the configuration is rejected
    /// - [`Error::Init`] naming the step whose transport access failed
    pub fn initialize<D>(
        &mut self,
        config: &MagConfig,
        delay: &mut D,
    ) -> Result<CalibrationValues, Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        let params = config.resolve().map_err(Error::Config)?;

        #[cfg(feature = "defmt")]
        if params.timing() == TimingSafety::Unsafe {
            defmt::warn!(
                "AK8963 init with unsafe timing: write {}ms, read {}ms",
                params.write_delay_ms(),
                params.read_delay_ms()
            );
        }

        self.state = InitState::Idle;
        self.params = None;
        self.calibration.clear();

        let mut trim = [0u8; TRIM_LEN as usize];
        for step in InitStep::SEQUENCE {
            self.state = InitState::Running(step);

            #[cfg(feature = "defmt")]
            defmt::debug!("AK8963 init step: {}", step);

            if let Err(cause) = self.run_step(step, &params, &mut trim, delay) {
                #[cfg(feature = "defmt")]
                defmt::error!("AK8963 init failed in {}", step);

                self.state = InitState::Failed(step);
                return Err(Error::Init(InitError { step, cause }));
            }
        }

        let calibration = CalibrationValues::from_trim(trim);

        #[cfg(feature = "defmt")]
        defmt::info!("AK8963 ready, ASA trim {}", trim);

        self.calibration.replace(calibration);
        self.params = Some(params);
        self.state = InitState::Ready;

        Ok(calibration)
    }

    fn run_step<D>(
        &mut self,
        step: InitStep,
        params: &EffectiveParameters,
        trim: &mut [u8; TRIM_LEN as usize],
        delay: &mut D,
    ) -> Result<(), I::Error>
    where
        D: embedded_hal::delay::DelayNs,
    {
        match step {
            InitStep::Reset => {
                self.prepare_relay()?;
                self.relay_write(AK8963_REG_CNTL2, AK8963_CNTL2_SRST)?;
            }
            InitStep::PowerDown1 | InitStep::PowerDown2 => {
                self.relay_write(AK8963_REG_CNTL1, MagMode::PowerDown as u8)?;
            }
            InitStep::FuseMode => {
                self.relay_write(AK8963_REG_CNTL1, AK8963_MODE_FUSE_ROM)?;
            }
            InitStep::ReadCalibration => {
                self.relay_read_request(AK8963_REG_ASAX, TRIM_LEN)?;
            }
            InitStep::SetMode => {
                self.relay_write(
                    AK8963_REG_CNTL1,
                    cntl1_value(params.mode(), params.resolution()),
                )?;
            }
            InitStep::ConfigureContinuousRead => {
                self.configure_sample_poll(params.sample_rate_divider())?;
            }
        }

        if step.is_read() {
            delay.delay_ms(params.read_delay_ms());
            self.read_staged(trim)?;
        } else {
            delay.delay_ms(params.write_delay_ms());
        }

        Ok(())
    }

    /// Put the host into I2C master mode for relaying
    fn prepare_relay(&mut self) -> Result<(), I::Error> {
        // Bypass would hand the auxiliary bus to the application processor
        self.device.int_pin_cfg().modify(|w| {
            w.set_bypass_en(false);
        })?;

        self.device.user_ctrl().modify(|w| {
            w.set_i_2_c_mst_en(true);
        })?;

        self.device.i_2_c_mst_ctrl().write(|w| {
            w.set_i_2_c_mst_clk(I2C_MST_CLK_400KHZ);
        })?;

        // Left over from a previous session's polling setup
        self.device.i_2_c_mst_delay_ctrl().modify(|w| {
            w.set_i_2_c_slv_0_dly_en(false);
        })?;

        Ok(())
    }

    /// Stop slave 0 so its target can be reprogrammed
    ///
    /// While enabled, the host keeps replaying the slave 0 transaction; a
    /// half-updated address/register/data set would reach the AK8963.
    fn disable_slave0(&mut self) -> Result<(), I::Error> {
        self.device.i_2_c_slv_0_ctrl().write(|w| {
            w.set_i_2_c_slv_0_en(false);
        })?;
        Ok(())
    }

    /// Queue a one-byte write to an AK8963 register through slave 0
    fn relay_write(&mut self, reg: u8, value: u8) -> Result<(), I::Error> {
        self.disable_slave0()?;

        self.device.i_2_c_slv_0_addr().write(|w| {
            w.set_i_2_c_id_0(AK8963_I2C_ADDRESS);
            w.set_i_2_c_slv_0_rnw(false);
        })?;

        self.device
            .i_2_c_slv_0_reg()
            .write(|w| w.set_i_2_c_slv_0_reg(reg))?;

        self.device
            .i_2_c_slv_0_do()
            .write(|w| w.set_i_2_c_slv_0_do(value))?;

        self.device.i_2_c_slv_0_ctrl().write(|w| {
            w.set_i_2_c_slv_0_leng(1);
            w.set_i_2_c_slv_0_en(true);
        })?;

        Ok(())
    }

    /// Queue a read of `len` AK8963 registers starting at `reg` through slave 0
    fn relay_read_request(&mut self, reg: u8, len: u8) -> Result<(), I::Error> {
        self.disable_slave0()?;

        self.device.i_2_c_slv_0_addr().write(|w| {
            w.set_i_2_c_id_0(AK8963_I2C_ADDRESS);
            w.set_i_2_c_slv_0_rnw(true);
        })?;

        self.device
            .i_2_c_slv_0_reg()
            .write(|w| w.set_i_2_c_slv_0_reg(reg))?;

        self.device.i_2_c_slv_0_ctrl().write(|w| {
            w.set_i_2_c_slv_0_leng(len);
            w.set_i_2_c_slv_0_en(true);
        })?;

        Ok(())
    }

    /// Block-read the host staging registers into `buffer`
    #[allow(clippy::cast_possible_truncation)]
    fn read_staged(&mut self, buffer: &mut [u8]) -> Result<(), I::Error> {
        // At most SAMPLE_POLL_LEN bytes
        let size_bits = (buffer.len() * 8) as u32;
        self.device
            .interface
            .read_register(EXT_SENS_DATA_00, size_bits, buffer)
    }

    /// Program slave 0 to poll ST1..ST2 on every `divider + 1` host samples
    fn configure_sample_poll(&mut self, divider: u8) -> Result<(), I::Error> {
        self.disable_slave0()?;

        self.device.i_2_c_slv_0_addr().write(|w| {
            w.set_i_2_c_id_0(AK8963_I2C_ADDRESS);
            w.set_i_2_c_slv_0_rnw(true);
        })?;

        self.device
            .i_2_c_slv_0_reg()
            .write(|w| w.set_i_2_c_slv_0_reg(AK8963_REG_ST1))?;

        self.device.i_2_c_slv_0_ctrl().write(|w| {
            w.set_i_2_c_slv_0_leng(SAMPLE_POLL_LEN);
            w.set_i_2_c_slv_0_en(true);
        })?;

        self.device.i_2_c_slv_4_ctrl().modify(|w| {
            w.set_i_2_c_mst_dly(divider);
        })?;

        self.device.i_2_c_mst_delay_ctrl().modify(|w| {
            w.set_i_2_c_slv_0_dly_en(true);
        })?;

        Ok(())
    }

    /// Read the latest raw sample from the host staging registers
    ///
    /// The ST2 overflow flag is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] unless the session is `Ready`, or a
    /// bus error.
    pub fn read_raw(&mut self) -> Result<RawSample, Error<I::Error>> {
        if !self.state.is_ready() {
            return Err(Error::NotInitialized);
        }

        let mut data = [0u8; SAMPLE_POLL_LEN as usize];
        self.read_staged(&mut data)?;

        let mut axes = [0u8; 6];
        axes.copy_from_slice(&data[SAMPLE_DATA_OFFSET..SAMPLE_DATA_OFFSET + 6]);
        Ok(RawSample::from_le_bytes(axes))
    }

    /// Read the latest sample, calibrated and scaled to µT×10
    ///
    /// # Example
    ///
    /// ```ignore
    /// let sample = mag.read_scaled()?;
    /// // 482 means 48.2 µT
    /// println!("X: {}, Y: {}, Z: {}", sample.x, sample.y, sample.z);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] unless the session is `Ready`, or a
    /// bus error.
    pub fn read_scaled(&mut self) -> Result<ScaledSample, Error<I::Error>> {
        if !self.state.is_ready() {
            return Err(Error::NotInitialized);
        }

        let calibration = self.calibration.get()?;
        let resolution = self
            .params
            .map(|params| params.resolution())
            .ok_or(Error::NotInitialized)?;

        let raw = self.read_raw()?;
        Ok(scale_sample(raw, &calibration, resolution))
    }

    /// Read the staged ST1 status byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] unless the session is `Ready`, or a
    /// bus error.
    pub fn status(&mut self) -> Result<MagStatus, Error<I::Error>> {
        if !self.state.is_ready() {
            return Err(Error::NotInitialized);
        }

        let st1 = self.device.ext_sens_data_00().read()?.ext_sens_data_00();
        Ok(MagStatus::new(st1))
    }

    /// Calibration of the current session
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] if no initialization has completed.
    pub fn calibration(&self) -> Result<CalibrationValues, Error<I::Error>> {
        self.calibration.get()
    }

    /// Parameters the current session was initialized with
    pub const fn parameters(&self) -> Option<&EffectiveParameters> {
        self.params.as_ref()
    }

    /// Whether the current session runs with nominal or overridden timing
    ///
    /// `None` until an initialization completes.
    pub fn timing_safety(&self) -> Option<TimingSafety> {
        self.params.map(|params| params.timing())
    }

    /// Current initialization state
    pub const fn state(&self) -> InitState {
        self.state
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.device.interface
    }
}
