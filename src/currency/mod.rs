//! Decimal amount formatting shared by reports and the CLI.

use rust_decimal::Decimal;

pub fn symbol_for(code: &str) -> &'static str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "BRL" => "R$",
        _ => "",
    }
}

/// Renders an amount with exactly two fractional digits and thousands
/// grouping, e.g. `1234.5` becomes `1,234.50`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let body = two_dp(rounded.abs());
    let grouped = match body.find('.') {
        Some(pos) => format!("{}{}", group_digits(&body[..pos]), &body[pos..]),
        None => group_digits(&body),
    };
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// `format_amount` with a currency symbol, e.g. `-$1,234.50`.
pub fn format_currency(amount: Decimal, code: &str) -> String {
    let symbol = symbol_for(code);
    let body = format_amount(amount);
    match body.strip_prefix('-') {
        Some(rest) => format!("-{symbol}{rest}"),
        None => format!("{symbol}{body}"),
    }
}

fn two_dp(value: Decimal) -> String {
    let text = value.to_string();
    match text.find('.') {
        None => format!("{text}.00"),
        Some(pos) if text.len() - pos - 1 == 1 => format!("{text}0"),
        Some(_) => text,
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}
