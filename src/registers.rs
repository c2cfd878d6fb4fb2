//! Register definitions for the MPU-9250 I2C master
//!
//! Only the host registers needed to relay transactions to the AK8963 are
//! described here. The MPU-9250 has a flat register map (no banks).
//!
//! ## Relay model
//! - **Slave 0** (`I2C_SLV0_*`) carries both one-shot relayed writes/reads during
//!   bring-up and the periodic sample poll once the magnetometer is running.
//! - Relayed read results land in `EXT_SENS_DATA_00` onwards.
//! - `I2C_SLV4_CTRL.I2C_MST_DLY` and `I2C_MST_DELAY_CTRL` throttle the poll rate.

device_driver::create_device!(
    device_name: Mpu9250,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// I2C_MST_CTRL - I2C Master Control (0x24)
        register I2cMstCtrl {
            const ADDRESS = 0x24;
            const SIZE_BITS = 8;

            /// I2C master clock speed (13 = 400 kHz)
            i2c_mst_clk: uint = 0..4,
            /// Stop between reads instead of restart
            i2c_mst_p_nsr: bool = 4,
            /// Write slave 3 data to the FIFO
            slv3_fifo_en: bool = 5,
            /// Delay data ready interrupt until external data is loaded
            wait_for_es: bool = 6,
            /// Multi-master enable
            mult_mst_en: bool = 7,
        },

        /// I2C_SLV0_ADDR (0x25)
        register I2cSlv0Addr {
            const ADDRESS = 0x25;
            const SIZE_BITS = 8;

            /// I2C slave 0 physical address
            i2c_id_0: uint = 0..7,
            /// I2C slave 0 read/write (1=read, 0=write)
            i2c_slv0_rnw: bool = 7,
        },

        /// I2C_SLV0_REG (0x26)
        register I2cSlv0Reg {
            const ADDRESS = 0x26;
            const SIZE_BITS = 8;

            /// I2C slave 0 register address
            i2c_slv0_reg: uint = 0..8,
        },

        /// I2C_SLV0_CTRL (0x27)
        register I2cSlv0Ctrl {
            const ADDRESS = 0x27;
            const SIZE_BITS = 8;

            /// Number of bytes to transfer
            i2c_slv0_leng: uint = 0..4,
            /// Register grouping for byte swapping
            i2c_slv0_grp: bool = 4,
            /// Transfer data only, without register address
            i2c_slv0_reg_dis: bool = 5,
            /// Swap bytes of word pairs
            i2c_slv0_byte_sw: bool = 6,
            /// I2C slave 0 enable
            i2c_slv0_en: bool = 7,
        },

        /// I2C_SLV4_CTRL (0x34)
        ///
        /// Slave 4 itself is unused; `I2C_MST_DLY` lives here and sets how many
        /// host samples pass between delayed slave accesses.
        register I2cSlv4Ctrl {
            const ADDRESS = 0x34;
            const SIZE_BITS = 8;

            /// Slave access decimation (accessed every 1 + N samples)
            i2c_mst_dly: uint = 0..5,
            /// I2C slave 4 register disable
            i2c_slv4_reg_dis: bool = 5,
            /// I2C slave 4 done interrupt enable
            slv4_done_int_en: bool = 6,
            /// I2C slave 4 enable
            i2c_slv4_en: bool = 7,
        },

        /// INT_PIN_CFG - Interrupt Pin Configuration (0x37)
        register IntPinCfg {
            const ADDRESS = 0x37;
            const SIZE_BITS = 8;

            reserved_0: uint = 0..1,
            /// Bypass enable (auxiliary bus joined to the host bus)
            bypass_en: bool = 1,
            /// FSYNC interrupt mode enable
            fsync_int_mode_en: bool = 2,
            /// FSYNC active low
            actl_fsync: bool = 3,
            /// Clear interrupt status on any read
            int_anyrd_2clear: bool = 4,
            /// Latch interrupt until cleared
            latch_int_en: bool = 5,
            /// INT open drain
            open: bool = 6,
            /// INT active low
            actl: bool = 7,
        },

        /// EXT_SENS_DATA_00 - External Sensor Data 00 (0x49)
        ///
        /// First of 24 staging registers; block reads start here.
        register ExtSensData00 {
            const ADDRESS = 0x49;
            const SIZE_BITS = 8;

            /// External sensor data byte 00
            ext_sens_data_00: uint = 0..8,
        },

        /// I2C_SLV0_DO (0x63)
        register I2cSlv0Do {
            const ADDRESS = 0x63;
            const SIZE_BITS = 8;

            /// I2C slave 0 data out
            i2c_slv0_do: uint = 0..8,
        },

        /// I2C_MST_DELAY_CTRL (0x67)
        register I2cMstDelayCtrl {
            const ADDRESS = 0x67;
            const SIZE_BITS = 8;

            /// I2C slave 0 delay enable
            i2c_slv0_dly_en: bool = 0,
            /// I2C slave 1 delay enable
            i2c_slv1_dly_en: bool = 1,
            /// I2C slave 2 delay enable
            i2c_slv2_dly_en: bool = 2,
            /// I2C slave 3 delay enable
            i2c_slv3_dly_en: bool = 3,
            /// I2C slave 4 delay enable
            i2c_slv4_dly_en: bool = 4,
            reserved_6_5: uint = 5..7,
            /// Delay shadowing of external sensor data
            delay_es_shadow: bool = 7,
        },

        /// USER_CTRL - User Control (0x6A)
        register UserCtrl {
            const ADDRESS = 0x6A;
            const SIZE_BITS = 8;

            /// Signal path reset
            sig_cond_rst: bool = 0,
            /// I2C master reset
            i2c_mst_rst: bool = 1,
            /// FIFO reset
            fifo_rst: bool = 2,
            reserved_3: uint = 3..4,
            /// I2C interface disable (SPI only)
            i2c_if_dis: bool = 4,
            /// I2C master enable
            i2c_mst_en: bool = 5,
            /// FIFO enable
            fifo_en: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// WHO_AM_I - Device ID Register (0x75)
        /// Expected value: 0x71 (MPU-9250) or 0x73 (MPU-9255)
        register WhoAmI {
            const ADDRESS = 0x75;
            const SIZE_BITS = 8;

            /// Device ID
            who_am_i: uint = 0..8,
        }
    }
);

/// Host I2C master clock setting for 400 kHz
pub const I2C_MST_CLK_400KHZ: u8 = 13;

/// First host staging register for data read from auxiliary slaves
pub const EXT_SENS_DATA_00: u8 = 0x49;
