//! Currency and number formatting for display strings.
//!
//! Two modes exist because screens disagree: the account card shows a plain
//! digit-grouped balance, while the insight screen shows an `Rp`-prefixed
//! id-ID locale string.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub const CURRENCY_PREFIX: &str = "Rp";
const GROUP_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';
/// id-ID `toLocaleString` keeps at most three fraction digits
const LOCALE_MAX_FRACTION_DIGITS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatMode {
    /// Digits grouped by `.`; the amount is otherwise passed through unrounded.
    /// A fractional part is kept but its separator becomes `,` so it cannot be
    /// mistaken for a group separator: `1234.50` -> `1.234,50`.
    Grouped,
    /// `Rp` prefix with id-ID number rules
    LocaleCurrency,
}

pub fn format(amount: Decimal, mode: FormatMode) -> String {
    match mode {
        FormatMode::Grouped => format_grouped(amount),
        FormatMode::LocaleCurrency => format_currency(amount),
    }
}

/// `1234567` -> `"1.234.567"`, `1234.50` -> `"1.234,50"` (see [`FormatMode::Grouped`])
pub fn format_grouped(amount: Decimal) -> String {
    render(&amount.to_string())
}

/// `1234567.891` -> `"Rp1.234.567,891"`, `-2500` -> `"Rp-2.500"`
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = amount
        .round_dp_with_strategy(LOCALE_MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        // avoid rendering "-0" for tiny negative inputs
        rounded = Decimal::ZERO;
    }
    format!("{}{}", CURRENCY_PREFIX, render(&rounded.to_string()))
}

fn render(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(plain.len() + plain.len() / 3 + 1);
    out.push_str(sign);
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}
