//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use ak8963::{Ak8963Driver, MagConfig, MagMode, MagResolution, MagSettings};

/// Mock delay implementation for testing
///
/// This is a no-op delay that implements the embedded-hal DelayNs trait
/// for use in tests where the delay sequence is not checked.
#[derive(Debug, Clone, Copy)]
pub struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {
        // No-op for testing
    }

    fn delay_us(&mut self, _us: u32) {
        // No-op for testing
    }

    fn delay_ms(&mut self, _ms: u32) {
        // No-op for testing
    }
}

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
pub fn create_mock_driver() -> (Ak8963Driver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    (Ak8963Driver::new(interface), interface_clone)
}

/// Continuous 100 Hz, 16-bit, 50 ms write delay, 10 ms read delay
pub fn default_config() -> MagConfig {
    MagConfig::new(MagSettings::new(
        MagMode::Continuous100Hz,
        MagResolution::Bits16,
    ))
}

/// Create a mock driver already initialized with `trim` and [`default_config`]
#[allow(dead_code)]
pub fn ready_driver(trim: [u8; 3]) -> (Ak8963Driver<MockInterface>, MockInterface) {
    let (mut driver, interface) = create_mock_driver();
    interface.set_trim(trim);
    driver
        .initialize(&default_config(), &mut MockDelay)
        .expect("mock initialization failed");
    interface.clear_operations();
    (driver, interface)
}

/// Assert that two floating point values are approximately equal
#[allow(dead_code)]
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
