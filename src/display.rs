//! Number formatting for the terminal front ends.

const MAX_DECIMALS: usize = 8;

/// With thousand separators, e.g. `1,234,567.5`.
#[cfg_attr(not(feature = "tui"), allow(dead_code))]
pub fn format_display(value: f64) -> String {
    format_number(value, true)
}

/// Raw number for scripting, e.g. `1234567.5`.
pub fn format_plain(value: f64) -> String {
    format_number(value, false)
}

fn format_number(value: f64, separators: bool) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value.is_sign_positive() { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }

    let fixed = format!("{:.*}", MAX_DECIMALS, value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let int_part = if separators {
        group_thousands(int_part)
    } else {
        int_part.to_string()
    };
    // "-0" after trimming a tiny negative value
    let sign = if negative && (int_part != "0" || frac_part.is_some()) { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, int_part, frac),
        None => format!("{}{}", sign, int_part),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
