//! Human-readable byte sizes.

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

/// Parse a size such as `"512MB"`, `"1.5 GiB"`, `"64k"` or `"1024"`.
///
/// Units are binary (`1KB` = 1024 bytes) and case-insensitive; a bare
/// number is a byte count.
///
/// # Example
///
/// ```
/// use uview::config::parse_size;
///
/// assert_eq!(parse_size("512MB"), Some(512 * 1024 * 1024));
/// assert_eq!(parse_size("1.5 KiB"), Some(1536));
/// assert_eq!(parse_size("lots"), None);
/// ```
pub fn parse_size(input: &str) -> Option<u64> {
    let input = input.trim();
    let split = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);
    if number.is_empty() {
        return None;
    }

    let multiplier = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => KIB,
        "m" | "mb" | "mib" => MIB,
        "g" | "gb" | "gib" => GIB,
        "t" | "tb" | "tib" => TIB,
        _ => return None,
    };

    if let Ok(whole) = number.parse::<u64>() {
        return whole.checked_mul(multiplier);
    }
    let value: f64 = number.parse().ok()?;
    let bytes = value * multiplier as f64;
    if bytes.is_finite() && bytes >= 0.0 && bytes <= u64::MAX as f64 {
        Some(bytes.round() as u64)
    } else {
        None
    }
}

/// Format a byte count with one decimal and a binary unit, e.g. `"512.0 MB"`.
pub fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= TIB => format!("{:.1} TB", b as f64 / TIB as f64),
        b if b >= GIB => format!("{:.1} GB", b as f64 / GIB as f64),
        b if b >= MIB => format!("{:.1} MB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.1} KB", b as f64 / KIB as f64),
        b => format!("{} B", b),
    }
}
