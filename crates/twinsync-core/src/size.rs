//! Human size expressions ("2GB", "500MB", "4096").

use crate::error::{Result, SyncError};

const UNITS: [(&str, u64); 5] = [
    ("TB", 1 << 40),
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
    ("B", 1),
];

/// Parse a size expression into a byte count.
///
/// Accepts `<number><unit>` where unit is one of B, KB, MB, GB, TB
/// (case-insensitive, binary multiples), or a bare integer. Fractional
/// numbers are truncated to whole bytes.
///
/// # Errors
///
/// Returns [`SyncError::InvalidSizeExpression`] when the input does not
/// match that grammar or overflows a `u64`.
pub fn parse_size(input: &str) -> Result<u64> {
    let invalid = || SyncError::InvalidSizeExpression {
        input: input.to_string(),
    };

    let s = input.trim().to_ascii_uppercase();
    if s.is_empty() {
        return Err(invalid());
    }

    let (number, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, mult)| s.strip_suffix(suffix).map(|n| (n.trim_end(), *mult)))
        .unwrap_or((s.as_str(), 1));

    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }

    if let Ok(whole) = number.parse::<u64>() {
        return whole.checked_mul(multiplier).ok_or_else(invalid);
    }

    let fractional: f64 = number.parse().map_err(|_| invalid())?;
    let bytes = fractional * multiplier as f64;
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(bytes as u64)
}
