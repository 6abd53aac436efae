const UNITS: [&str; 6] = ["KB", "MB", "GB", "TB", "PB", "EB"];

/// Formats a byte count with binary (1024) steps and one decimal place.
/// Values below 1 KB are printed as whole bytes.
///
/// The unit is picked before rounding, so values just under a step print
/// as `1024.0` of the smaller unit (1 048 575 is `"1024.0 KB"`).
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", UNITS[unit])
}
