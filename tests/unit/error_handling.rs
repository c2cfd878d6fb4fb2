//! Unit tests for error handling and recovery

use crate::common::test_utils::MockDelay;
use crate::common::{MockError, create_mock_driver, default_config, ready_driver, reg};
use ak8963::{ConfigError, Error, InitError, InitState, InitStep};

#[test]
fn test_verify_host_accepts_known_ids() {
    for id in [ak8963::WHO_AM_I_MPU9250, ak8963::WHO_AM_I_MPU9255] {
        let (mut driver, interface) = create_mock_driver();
        interface.set_who_am_i(id);

        assert_eq!(driver.verify_host().unwrap(), id);
    }
}

#[test]
fn test_verify_host_rejects_unknown_id() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_who_am_i(0xEA);

    let result = driver.verify_host();

    assert!(matches!(result, Err(Error::InvalidDevice(0xEA))));
    assert_eq!(driver.read_host_who_am_i().unwrap(), 0xEA);
}

#[test]
fn test_verify_host_bus_failure() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_read();

    let result = driver.verify_host();

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
}

#[test]
fn test_verify_magnetometer_accepts_ak8963() {
    let (mut driver, interface) = create_mock_driver();
    let mut delay = interface.delay();

    assert_eq!(driver.verify_magnetometer(&mut delay).unwrap(), 0x48);

    // One relayed read with the default read settle, no AK8963 writes
    assert_eq!(interface.delays(), vec![10]);
    assert!(interface.mag_writes().is_empty());
    assert_eq!(driver.state(), InitState::Idle);
}

#[test]
fn test_verify_magnetometer_rejects_unknown_id() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_mag_who_am_i(0x09);

    let result = driver.verify_magnetometer(&mut MockDelay);

    assert!(matches!(result, Err(Error::InvalidMagnetometer(0x09))));
    assert_eq!(driver.read_mag_who_am_i(&mut MockDelay).unwrap(), 0x09);
}

#[test]
fn test_verify_magnetometer_bus_failure() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_read_at(reg::EXT_SENS_DATA_00);

    assert!(matches!(
        driver.verify_magnetometer(&mut MockDelay),
        Err(Error::Bus(MockError::Communication))
    ));
}

#[test]
fn test_read_failure_recovery() {
    let (mut driver, interface) = ready_driver([128, 128, 128]);
    interface.set_mag_data(10, 20, 30);

    // Inject a read failure
    interface.fail_next_read();

    let result = driver.read_scaled();
    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    assert_eq!(driver.state(), InitState::Ready);

    // Subsequent read should succeed (error was only for one operation)
    let sample = driver.read_scaled().unwrap();
    assert_eq!((sample.x, sample.y, sample.z), (15, 30, 45));
}

#[test]
fn test_status_bus_failure() {
    let (mut driver, interface) = ready_driver([128, 128, 128]);
    interface.fail_next_read();

    assert!(matches!(
        driver.status(),
        Err(Error::Bus(MockError::Communication))
    ));
}

#[test]
fn test_host_preparation_failure_is_reset_step() {
    let (mut driver, interface) = create_mock_driver();
    // First access of the sequence is the INT_PIN_CFG read
    interface.fail_next_read();

    let result = driver.initialize(&default_config(), &mut MockDelay);

    assert!(matches!(
        result,
        Err(Error::Init(InitError {
            step: InitStep::Reset,
            ..
        }))
    ));
    assert!(interface.mag_writes().is_empty());
}

#[test]
fn test_error_display() {
    let err: Error<MockError> = Error::Init(InitError {
        step: InitStep::FuseMode,
        cause: MockError::Communication,
    });
    assert_eq!(
        err.to_string(),
        "initialization failed in FuseMode: Communication"
    );

    let err: Error<MockError> = Error::Config(ConfigError::InvalidScale(3));
    assert_eq!(
        err.to_string(),
        "invalid configuration: scale 3 is not 0 or 1"
    );

    let err: Error<MockError> = Error::NotInitialized;
    assert_eq!(err.to_string(), "magnetometer not initialized");

    let err: Error<MockError> = Error::InvalidDevice(0x12);
    assert_eq!(err.to_string(), "unexpected host WHO_AM_I 0x12");

    let err: Error<MockError> = Error::InvalidMagnetometer(0x09);
    assert_eq!(err.to_string(), "unexpected AK8963 WIA 0x09");
}

#[test]
fn test_release_returns_shared_interface() {
    let (mut driver, interface) = ready_driver([128, 128, 128]);
    let _ = driver.status();

    let released = driver.release();

    released.set_register(reg::WHO_AM_I, 0x42);
    assert_eq!(interface.get_register(reg::WHO_AM_I), 0x42);
}
