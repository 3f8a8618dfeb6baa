//! Lenient parsing of numbers typed into the form.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

/// Parses user input into a `Decimal`, never failing.
///
/// Leading whitespace is skipped and the longest numeric prefix is parsed, so `"12abc"` is `12`
/// and `" 3.5 "` is `3.5`. Input with no numeric prefix, like `""` or `"abc"`, is `0`. So is
/// anything a `Decimal` cannot hold.
pub fn coerce_number(raw: &str) -> Decimal {
    let Some((mantissa, exponent)) = numeric_prefix(raw.trim_start()) else {
        trace!("No numeric prefix in {raw:?}, using 0");
        return Decimal::ZERO;
    };
    match scale(&mantissa, exponent) {
        Some(value) => value,
        None => {
            trace!("Unable to represent {raw:?} as a decimal, using 0");
            Decimal::ZERO
        }
    }
}

/// Computes `mantissa × 10^exponent`, or `None` if it does not fit in a `Decimal`.
fn scale(mantissa: &str, exponent: i64) -> Option<Decimal> {
    let base = Decimal::from_str(mantissa).ok()?;
    if exponent == 0 || base.is_zero() {
        return Some(base);
    }
    let magnitude = u32::try_from(exponent.unsigned_abs()).ok()?;
    if magnitude > MAX_EXPONENT {
        return None;
    }
    let factor = Decimal::from_i128_with_scale(10_i128.pow(magnitude), 0);
    if exponent > 0 {
        base.checked_mul(factor)
    } else {
        base.checked_div(factor)
    }
}

/// The largest power of ten a `Decimal` can hold.
const MAX_EXPONENT: u32 = 28;

/// Finds the longest prefix of `s` shaped like `[+-]?(d+[.d*]|.d+)([eE][+-]?d+)?`. Returns the
/// mantissa normalized for `Decimal` parsing (no leading plus, no trailing dot) and the exponent.
fn numeric_prefix(s: &str) -> Option<(String, i64)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let int_start = i;
    i += count_digits(&bytes[i..]);
    let int_part = &s[int_start..i];

    let mut frac_part = "";
    if bytes.get(i) == Some(&b'.') {
        let frac_len = count_digits(&bytes[i + 1..]);
        frac_part = &s[i + 1..i + 1 + frac_len];
        if !int_part.is_empty() || !frac_part.is_empty() {
            i += 1 + frac_len;
        }
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut number = String::with_capacity(i + 8);
    if negative {
        number.push('-');
    }
    number.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        number.push('.');
        number.push_str(frac_part);
    }

    let mut exponent = 0;
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        let exp_negative = match bytes.get(j) {
            Some(b'-') => {
                j += 1;
                true
            }
            Some(b'+') => {
                j += 1;
                false
            }
            _ => false,
        };
        let exp_len = count_digits(&bytes[j..]);
        if exp_len > 0 {
            // Exponents too long for an i64 are far outside what a Decimal can hold anyway.
            let digits = s[j..j + exp_len].parse::<i64>().unwrap_or(i64::MAX);
            exponent = if exp_negative { -digits } else { digits };
        }
    }

    Some((number, exponent))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
