//! WMO weather interpretation codes as reported by Open-Meteo

/// Translate a weather code into a short description. Total: unknown codes
/// map to "Unknown conditions".
#[must_use]
pub fn describe_weather_code(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1..=3 => "Partly cloudy",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown conditions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "Clear sky")]
    #[case(1, "Partly cloudy")]
    #[case(3, "Partly cloudy")]
    #[case(45, "Fog")]
    #[case(48, "Fog")]
    #[case(53, "Drizzle")]
    #[case(57, "Freezing drizzle")]
    #[case(61, "Rain")]
    #[case(67, "Freezing rain")]
    #[case(75, "Snow")]
    #[case(77, "Snow grains")]
    #[case(81, "Rain showers")]
    #[case(86, "Snow showers")]
    #[case(95, "Thunderstorm")]
    #[case(96, "Thunderstorm with hail")]
    #[case(99, "Thunderstorm with hail")]
    fn test_known_codes(#[case] code: i64, #[case] expected: &str) {
        assert_eq!(describe_weather_code(code), expected);
    }

    #[rstest]
    #[case(-1)]
    #[case(4)]
    #[case(50)]
    #[case(97)]
    #[case(100)]
    #[case(i64::MAX)]
    fn test_unknown_codes(#[case] code: i64) {
        assert_eq!(describe_weather_code(code), "Unknown conditions");
    }
}
