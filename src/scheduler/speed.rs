// Speed control to delay mapping
//
// The raw slider value first becomes an "animation speed" through three bands:
// a quadratic ease for the slowest fifth, a gentler linear ramp up to 40, and a
// direct pass-through above that. The step delay then falls linearly from
// BASE_DELAY_MS as the animation speed grows.

use crate::models::SpeedSetting;
use std::time::Duration;

/// Step delay at animation speed zero
pub const BASE_DELAY_MS: f64 = 500.0;

/// Milliseconds removed from the step delay per unit of animation speed
pub const DELAY_PER_SPEED_MS: f64 = 4.5;

/// Default floor for any computed delay
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(10);

/// Phase delays are measured in fifths of the current step delay
const PHASE_UNITS_PER_STEP: u32 = 5;

const SLOW_BAND_END: u32 = 20;
const GENTLE_BAND_END: u32 = 40;

/// Animation speed for a raw slider value (0-100 scale)
pub fn animation_speed(speed: SpeedSetting) -> f64 {
    let raw = speed.raw();
    let slow_end = f64::from(SLOW_BAND_END);
    if raw <= SLOW_BAND_END {
        (f64::from(raw) / slow_end).powi(2) * slow_end
    } else if raw <= GENTLE_BAND_END {
        slow_end + f64::from(raw - SLOW_BAND_END) * 1.5
    } else {
        // The gentle band tops out at 50; holding that value until the raw
        // value catches up keeps the mapping monotone.
        let gentle_top = slow_end + f64::from(GENTLE_BAND_END - SLOW_BAND_END) * 1.5;
        f64::from(raw).max(gentle_top)
    }
}

/// Delay between two steps in timed mode, never below `floor`
pub fn step_delay(speed: SpeedSetting, floor: Duration) -> Duration {
    let millis = BASE_DELAY_MS - animation_speed(speed) * DELAY_PER_SPEED_MS;
    Duration::from_micros((millis.max(0.0) * 1000.0).round() as u64).max(floor)
}

/// Delay for a visual phase lasting `units` fifths of a step, never below `floor`
pub fn phase_delay(speed: SpeedSetting, units: u32, floor: Duration) -> Duration {
    let unit = step_delay(speed, Duration::ZERO) / PHASE_UNITS_PER_STEP;
    (unit * units).max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MAX_SPEED, MIN_SPEED};

    #[test]
    fn test_band_edges() {
        assert_eq!(animation_speed(SpeedSetting::new(20)), 20.0);
        assert_eq!(animation_speed(SpeedSetting::new(10)), 5.0);
        assert_eq!(animation_speed(SpeedSetting::new(40)), 50.0);
        assert_eq!(animation_speed(SpeedSetting::new(41)), 50.0);
        assert_eq!(animation_speed(SpeedSetting::new(75)), 75.0);
    }

    #[test]
    fn test_step_delay_values() {
        assert_eq!(
            step_delay(SpeedSetting::new(100), DEFAULT_MIN_DELAY),
            Duration::from_millis(50)
        );
        assert_eq!(
            step_delay(SpeedSetting::new(50), DEFAULT_MIN_DELAY),
            Duration::from_millis(275)
        );
    }

    #[test]
    fn test_step_delay_monotone_and_floored() {
        let floor = Duration::from_millis(120);
        let mut previous = Duration::MAX;
        for raw in MIN_SPEED..=MAX_SPEED {
            let delay = step_delay(SpeedSetting::new(raw), floor);
            assert!(delay <= previous, "delay rose at raw speed {}", raw);
            assert!(delay >= floor);
            previous = delay;
        }
    }

    #[test]
    fn test_phase_delay_scales_with_step() {
        let speed = SpeedSetting::new(50);
        let short = phase_delay(speed, 2, DEFAULT_MIN_DELAY);
        let long = phase_delay(speed, 10, DEFAULT_MIN_DELAY);
        assert_eq!(short, Duration::from_millis(110));
        assert_eq!(long, Duration::from_millis(550));
        assert_eq!(phase_delay(speed, 0, DEFAULT_MIN_DELAY), DEFAULT_MIN_DELAY);
    }
}
