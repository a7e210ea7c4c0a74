const UNITS: [&str; 8] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Human-readable byte size, always in KiB or larger.
///
/// Divides by 1024 at least once and keeps dividing while the value exceeds
/// 1024, then shows one decimal place with a floor of `0.1`. Exactly 1024 of
/// a unit is not promoted, so 1 MiB reads `1024.0 KiB`.
///
/// ```
/// use magview_filetree::humanize;
///
/// assert_eq!(humanize(1536), "1.5 KiB");
/// assert_eq!(humanize(3), "0.1 KiB");
/// ```
pub fn humanize(bytes: u64) -> String {
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value > 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    // Round half up, like a JavaScript `toFixed(1)`.
    let value = (value.max(0.1) * 10.0).round() / 10.0;
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0.1 KiB")]
    #[case(10, "0.1 KiB")]
    #[case(1024, "1.0 KiB")]
    #[case(1536, "1.5 KiB")]
    #[case(1024 * 1024, "1024.0 KiB")]
    #[case(1024 * 1024 + 1, "1.0 MiB")]
    #[case(5 * 1024 * 1024 * 1024, "5.0 GiB")]
    #[case(u64::MAX, "16.0 EiB")]
    fn test_humanize(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(humanize(bytes), expected);
    }
}
