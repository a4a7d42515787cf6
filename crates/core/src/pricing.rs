//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Serializer;

/// Group separator used by the `ru-RU` locale (no-break space).
const GROUP_SEPARATOR: char = '\u{a0}';

/// Decimal separator used by the `ru-RU` locale.
const DECIMAL_SEPARATOR: char = ',';

/// Most fraction digits shown by the `ru-RU` number format.
const FRACTION_DIGITS: u32 = 3;

/// Looks up a supported ISO currency by its alphabetic code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code {
        "RUB" => Some(iso::RUB),
        "EUR" => Some(iso::EUR),
        "USD" => Some(iso::USD),
        "GBP" => Some(iso::GBP),
        _ => None,
    }
}

/// Formats `amount` the `ru-RU` way: digits grouped in threes and at most three
/// fraction digits after a comma (`15 000`, `1 999,5`).
pub fn group_digits(amount: Decimal) -> String {
    let amount = amount
        .round_dp_with_strategy(FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    let whole = amount.trunc().abs().to_string();
    let mut grouped = String::with_capacity(whole.len() * 2);

    if amount.is_sign_negative() && !amount.is_zero() {
        grouped.push('-');
    }

    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }

        grouped.push(digit);
    }

    let fraction = amount.fract().abs().to_string();

    if let Some(digits) = fraction.strip_prefix("0.") {
        grouped.push(DECIMAL_SEPARATOR);
        grouped.push_str(digits);
    }

    grouped
}

/// Formats an amount followed by the currency symbol (`15 000 ₽`).
pub fn format_price(amount: Decimal, currency: &Currency) -> String {
    format!("{} {}", group_digits(amount), currency.symbol)
}

/// Formats money in its own currency.
pub fn format_money(money: &Money<'_, Currency>) -> String {
    format_price(*money.amount(), money.currency())
}

/// Writes an amount as a JSON number: whole amounts as integers, the rest as
/// floats.
pub(crate) fn serialize_amount<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match amount.to_u64() {
        Some(whole) if amount.fract().is_zero() => serializer.serialize_u64(whole),
        _ => serializer.serialize_f64(amount.to_f64().unwrap_or_default()),
    }
}
