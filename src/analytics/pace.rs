// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pace and time arithmetic shared by every engine.
//!
//! Two pace conventions exist on purpose:
//! - [`pace_min_per_km`] is for display and yields `0.0` for zero distance.
//! - [`comparable_pace`] is for best-pace reductions and yields `+inf` for
//!   zero distance, so such runs never win.

/// Base distance (km) for Riegel scaling.
pub const RIEGEL_BASE_KM: f64 = 5.0;
/// Riegel fatigue exponent.
pub const RIEGEL_EXPONENT: f64 = 1.06;

/// Pace in minutes per km, `0.0` when there is no distance.
pub fn pace_min_per_km(distance_meters: f64, time_seconds: f64) -> f64 {
    if distance_meters > 0.0 {
        (time_seconds / 60.0) / (distance_meters / 1000.0)
    } else {
        0.0
    }
}

/// Pace in minutes per km, `+inf` when there is no distance.
pub fn comparable_pace(distance_meters: f64, time_seconds: f64) -> f64 {
    if distance_meters > 0.0 {
        (time_seconds / 60.0) / (distance_meters / 1000.0)
    } else {
        f64::INFINITY
    }
}

/// Render a pace in minutes as `M:SS`.
///
/// Seconds that round up to 60 roll over into the next minute.
/// Non-finite or negative input renders as `N/A`.
pub fn format_pace(minutes: f64) -> String {
    if !minutes.is_finite() || minutes < 0.0 {
        return "N/A".to_string();
    }

    let mut whole_minutes = minutes.floor() as u64;
    let mut seconds = ((minutes - minutes.floor()) * 60.0).round() as u64;
    if seconds >= 60 {
        whole_minutes += 1;
        seconds = 0;
    }

    format!("{}:{:02}", whole_minutes, seconds)
}

/// Split a pace in seconds per km into whole `(minutes, seconds)`, rolling
/// 60 rounded seconds into the next minute. Non-finite input is `(0, 0)`.
pub fn pace_parts(seconds_per_km: f64) -> (u64, u64) {
    if !seconds_per_km.is_finite() || seconds_per_km <= 0.0 {
        return (0, 0);
    }

    let mut minutes = (seconds_per_km / 60.0).floor() as u64;
    let mut seconds = (seconds_per_km % 60.0).round() as u64;
    if seconds >= 60 {
        minutes += 1;
        seconds = 0;
    }
    (minutes, seconds)
}

/// Seconds-per-km pace rendered as `M:SS`.
pub fn format_pace_seconds(seconds_per_km: f64) -> String {
    let (minutes, seconds) = pace_parts(seconds_per_km);
    format!("{}:{:02}", minutes, seconds)
}

/// Riegel prediction (minutes) for `target_km`, scaled from a 5 km effort
/// run at `base_pace_min_per_km`.
pub fn predict_race_time(target_km: f64, base_pace_min_per_km: f64) -> f64 {
    base_pace_min_per_km * RIEGEL_BASE_KM * (target_km / RIEGEL_BASE_KM).powf(RIEGEL_EXPONENT)
}

/// Render a duration in minutes: `HhMMmin` from one hour up, `MminSSs`
/// below.
pub fn format_duration(minutes: f64) -> String {
    if !minutes.is_finite() || minutes < 0.0 {
        return "N/A".to_string();
    }

    let hours = (minutes / 60.0).floor() as u64;
    let mins = (minutes % 60.0).floor() as u64;
    let secs = ((minutes % 1.0) * 60.0).floor() as u64;

    if hours > 0 {
        format!("{}h{:02}min", hours, mins)
    } else {
        format!("{}min{:02}s", mins, secs)
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pace_from_distance_and_time() {
        // 10 km in 50 minutes
        assert_eq!(pace_min_per_km(10_000.0, 3000.0), 5.0);
        assert_eq!(comparable_pace(10_000.0, 3000.0), 5.0);
    }

    #[test]
    fn test_zero_distance_conventions_differ() {
        assert_eq!(pace_min_per_km(0.0, 600.0), 0.0);
        assert_eq!(comparable_pace(0.0, 600.0), f64::INFINITY);
        assert!(comparable_pace(0.0, 600.0) > comparable_pace(1.0, 1_000_000.0));
    }

    #[test]
    fn test_format_pace_pads_seconds() {
        assert_eq!(format_pace(5.0), "5:00");
        assert_eq!(format_pace(5.5), "5:30");
        assert_eq!(format_pace(4.1), "4:06");
        assert_eq!(format_pace(0.0), "0:00");
    }

    #[test]
    fn test_format_pace_rolls_over_sixty_seconds() {
        assert_eq!(format_pace(5.9999), "6:00");
        assert_eq!(format_pace(5.995), "6:00");
        assert_eq!(format_pace(9.999_999), "10:00");
    }

    #[test]
    fn test_format_pace_non_finite() {
        assert_eq!(format_pace(f64::INFINITY), "N/A");
        assert_eq!(format_pace(f64::NAN), "N/A");
    }

    #[test]
    fn test_pace_parts_from_seconds() {
        assert_eq!(pace_parts(300.0), (5, 0));
        assert_eq!(pace_parts(327.4), (5, 27));
        assert_eq!(pace_parts(359.6), (6, 0));
        assert_eq!(pace_parts(0.0), (0, 0));
        assert_eq!(pace_parts(f64::INFINITY), (0, 0));
        assert_eq!(format_pace_seconds(301.0), "5:01");
    }

    #[test]
    fn test_predict_race_time_matches_formula() {
        let expected = 5.0 * 5.0 * (21.1f64 / 5.0).powf(1.06);
        assert_eq!(predict_race_time(21.1, 5.0), expected);

        // The base distance maps onto itself
        assert_eq!(predict_race_time(5.0, 5.0), 25.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(25.5), "25min30s");
        assert_eq!(format_duration(9.25), "9min15s");
        assert_eq!(format_duration(60.0), "1h00min");
        assert_eq!(format_duration(115.25), "1h55min");
        assert_eq!(format_duration(245.9), "4h05min");
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round1(12.345), 12.3);
        assert_eq!(round1(12.36), 12.4);
        assert_eq!(round2(10.2345), 10.23);
    }
}
