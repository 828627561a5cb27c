//! Thousands-separated number rendering for report columns.

use num_format::{Locale, ToFormattedString};

/// `1234567` as `"1,234,567"`.
#[must_use]
pub fn thousands(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Signed variant of [`thousands`], e.g. `"-1,024"`.
#[must_use]
pub fn thousands_signed(n: i128) -> String {
    n.to_formatted_string(&Locale::en)
}

/// A float with `decimals` places and a grouped integer part, e.g.
/// `1234.5` with one decimal as `"1,234.5"`.
#[must_use]
pub fn thousands_fixed(x: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, x.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .map_or((formatted.as_str(), None), |(i, f)| (i, Some(f)));

    let mut out = String::new();
    // -0.0 and values that round to zero print without a sign
    if x < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    match int_part.parse::<u128>() {
        Ok(int) => out.push_str(&int.to_formatted_string(&Locale::en)),
        Err(_) => out.push_str(int_part),
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
