//! Unit tests for the calibration store as seen through the driver

use crate::common::test_utils::MockDelay;
use crate::common::{assert_float_eq, create_mock_driver, default_config, reg};
use ak8963::{CalibrationValues, Error, InitState};

#[test]
fn test_no_calibration_before_initialize() {
    let (driver, _interface) = create_mock_driver();

    assert!(matches!(driver.calibration(), Err(Error::NotInitialized)));
}

#[test]
fn test_trim_bytes_become_adjustments() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_trim([0, 128, 255]);

    let returned = driver
        .initialize(&default_config(), &mut MockDelay)
        .unwrap();
    let stored = driver.calibration().unwrap();

    assert_eq!(returned, stored);
    assert_eq!(stored.trim(), [0, 128, 255]);
    assert_float_eq(stored.x(), 0.5, 1e-6);
    assert_float_eq(stored.y(), 1.0, 1e-6);
    assert_float_eq(stored.z(), 1.496_093_8, 1e-6);
}

#[test]
fn test_trims_read_in_fuse_mode_only() {
    // The mock returns zero trims outside fuse ROM mode, so a neutral
    // result proves the read happened while fuse access was active.
    let (mut driver, interface) = create_mock_driver();
    interface.set_trim([128, 128, 128]);

    let calibration = driver
        .initialize(&default_config(), &mut MockDelay)
        .unwrap();

    assert_eq!(calibration, CalibrationValues::default());
}

#[test]
fn test_reinitialize_replaces_calibration() {
    let (mut driver, interface) = create_mock_driver();

    interface.set_trim([100, 110, 120]);
    driver
        .initialize(&default_config(), &mut MockDelay)
        .unwrap();
    assert_eq!(driver.calibration().unwrap().trim(), [100, 110, 120]);

    interface.set_trim([200, 210, 220]);
    driver
        .initialize(&default_config(), &mut MockDelay)
        .unwrap();
    assert_eq!(driver.calibration().unwrap().trim(), [200, 210, 220]);
}

#[test]
fn test_failed_reinitialize_clears_calibration() {
    let (mut driver, interface) = create_mock_driver();
    driver
        .initialize(&default_config(), &mut MockDelay)
        .unwrap();
    assert!(driver.calibration().is_ok());

    interface.fail_write_when(reg::I2C_SLV0_DO, 0x0F, 1);
    assert!(driver.initialize(&default_config(), &mut MockDelay).is_err());

    assert!(matches!(driver.state(), InitState::Failed(_)));
    assert!(matches!(driver.calibration(), Err(Error::NotInitialized)));
}
