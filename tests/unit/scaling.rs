//! Unit tests for sample reads and scaling

use crate::common::test_utils::MockDelay;
use crate::common::{assert_float_eq, create_mock_driver, ready_driver};
use ak8963::{
    CalibrationValues, Error, MagConfig, MagMode, MagResolution, MagSettings, RawSample,
    ScaledSample, scale_sample,
};

#[test]
fn test_read_scaled_neutral_16_bit() {
    let (mut driver, interface) = ready_driver([128, 128, 128]);
    interface.set_mag_data(1000, -2000, 333);

    let sample = driver.read_scaled().unwrap();

    assert_eq!(
        sample,
        ScaledSample {
            x: 1500,
            y: -3000,
            z: 500,
        }
    );
}

#[test]
fn test_read_scaled_applies_trim_14_bit() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_trim([0, 128, 255]);
    let config = MagConfig::new(MagSettings::new(
        MagMode::Continuous8Hz,
        MagResolution::Bits14,
    ));
    driver.initialize(&config, &mut MockDelay).unwrap();
    interface.set_mag_data(100, 100, 100);

    let sample = driver.read_scaled().unwrap();

    assert_eq!(sample.x, 300);
    assert_eq!(sample.y, 600);
    assert_eq!(sample.z, 898);
}

#[test]
fn test_zero_field_for_any_calibration() {
    for trim in [[0, 0, 0], [128, 128, 128], [255, 255, 255]] {
        let (mut driver, interface) = ready_driver(trim);
        interface.set_mag_data(0, 0, 0);

        assert_eq!(driver.read_scaled().unwrap(), ScaledSample::default());
    }
}

#[test]
fn test_overflow_flag_is_ignored() {
    let (mut driver, interface) = ready_driver([128, 128, 128]);
    interface.set_mag_data(100, 200, 300);
    interface.set_mag_status(0x01, 0x08); // ST2.HOFL

    let sample = driver.read_scaled().unwrap();

    assert_eq!(sample, ScaledSample { x: 150, y: 300, z: 450 });
}

#[test]
fn test_read_raw_little_endian() {
    let (mut driver, interface) = ready_driver([128, 128, 128]);
    interface.set_mag_data(0x1234, -1, i16::MIN);

    let raw = driver.read_raw().unwrap();

    assert_eq!(
        raw,
        RawSample {
            x: 0x1234,
            y: -1,
            z: i16::MIN,
        }
    );
}

#[test]
fn test_read_scaled_matches_pure_scaling() {
    let (mut driver, interface) = ready_driver([90, 140, 230]);
    interface.set_mag_data(-12_345, 4_321, 32_000);

    let raw = driver.read_raw().unwrap();
    let expected = scale_sample(
        raw,
        &CalibrationValues::from_trim([90, 140, 230]),
        MagResolution::Bits16,
    );

    assert_eq!(driver.read_scaled().unwrap(), expected);
}

#[test]
fn test_status_reports_staged_st1() {
    let (mut driver, interface) = ready_driver([128, 128, 128]);

    interface.set_mag_status(0x01, 0x00);
    let status = driver.status().unwrap();
    assert!(status.data_ready());
    assert!(!status.data_overrun());

    interface.set_mag_status(0x03, 0x00);
    let status = driver.status().unwrap();
    assert!(status.data_overrun());
    assert_eq!(status.bits(), 0x03);
}

#[test]
fn test_micro_tesla_conversion() {
    let (mut driver, interface) = ready_driver([128, 128, 128]);
    interface.set_mag_data(200, 0, 0); // 30.0 µT

    let ut = driver.read_scaled().unwrap().to_micro_tesla();

    assert_float_eq(ut.x, 30.0, 0.001);
    assert_float_eq(ut.magnitude(), 30.0, 0.001);
}

#[test]
fn test_reads_before_initialize() {
    let (mut driver, interface) = create_mock_driver();

    assert!(matches!(driver.read_scaled(), Err(Error::NotInitialized)));
    assert!(matches!(driver.read_raw(), Err(Error::NotInitialized)));
    assert!(matches!(driver.status(), Err(Error::NotInitialized)));
    assert!(interface.operations().is_empty());
}
