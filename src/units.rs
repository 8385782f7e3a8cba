//! Unit conversions between the imperial values the provider returns and
//! their metric display counterparts.

const CM_PER_INCH: f64 = 2.54;
const KPH_PER_MPH: f64 = 1.60934;
const METERS_PER_FOOT: f64 = 0.3048;
const METERS_PER_MILE: f64 = 1609.34;
const MM_PER_INCH: f64 = 25.4;

/// Round half away from zero to `places` decimal places.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

#[must_use]
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

#[must_use]
pub fn inches_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

#[must_use]
pub fn mph_to_kph(mph: f64) -> f64 {
    mph * KPH_PER_MPH
}

#[must_use]
pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

#[must_use]
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

#[must_use]
pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

/// Snow depth in metric: centimeters, or millimeters below one centimeter.
/// Zero renders as `0 cm`.
#[must_use]
pub fn inches_to_metric(inches: f64) -> String {
    if inches == 0.0 {
        return "0 cm".to_string();
    }

    let cm = inches_to_cm(inches);
    if cm < 1.0 {
        format!("{} mm", round_to(cm * 10.0, 2))
    } else {
        format!("{} cm", round_to(cm, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.345_6, 2), 2.35);
        assert_eq!(round_to(-1.25, 1), -1.3);
        assert_eq!(round_to(7.0, 0), 7.0);
    }

    #[rstest]
    #[case(32.0, 0.0)]
    #[case(212.0, 100.0)]
    #[case(-40.0, -40.0)]
    fn test_fahrenheit_to_celsius(#[case] f: f64, #[case] c: f64) {
        assert!((fahrenheit_to_celsius(f) - c).abs() < 1e-9);
    }

    #[test]
    fn test_speed_and_length() {
        assert_eq!(round_to(mph_to_kph(10.0), 2), 16.09);
        assert_eq!(round_to(feet_to_meters(10_000.0), 0), 3048.0);
        assert_eq!(round_to(meters_to_miles(1609.34), 1), 1.0);
        assert_eq!(meters_to_km(2500.0), 2.5);
        assert_eq!(inches_to_cm(1.0), 2.54);
        assert_eq!(inches_to_mm(2.0), 50.8);
    }

    #[rstest]
    #[case(0.0, "0 cm")]
    #[case(0.2, "5.08 mm")]
    #[case(2.5, "6.35 cm")]
    #[case(6.0, "15.24 cm")]
    fn test_inches_to_metric(#[case] inches: f64, #[case] expected: &str) {
        assert_eq!(inches_to_metric(inches), expected);
    }
}
