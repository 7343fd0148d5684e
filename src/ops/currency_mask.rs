use crate::model::{Amount, Currency};

/// Digits kept by the input mask; more would overflow minor units
pub const MAX_DIGITS: usize = 15;

/// Error type for parsing masked amounts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaskError {
    #[error("empty value cannot be parsed")]
    Empty,
    #[error("invalid currency format: {0}")]
    Invalid(String),
    #[error("amount out of range: {0}")]
    Overflow(String),
}

/// Reformat raw keyboard input as a currency amount while the user types.
///
/// Every digit is kept (up to [`MAX_DIGITS`]) and read as minor units, so
/// typing `1`, `2`, `3` renders `R$ 0,01`, `R$ 0,12`, `R$ 1,23`. A `-` typed
/// before the first digit makes the amount negative. Input without digits
/// renders as an empty string.
pub fn mask(input: &str, currency: &Currency) -> String {
    let negative = input
        .chars()
        .take_while(|c| !c.is_ascii_digit())
        .any(|c| c == '-');
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_DIGITS)
        .collect();
    if digits.is_empty() {
        return String::new();
    }
    let minor = digits.parse::<i64>().unwrap_or_default();
    format(Amount(if negative { -minor } else { minor }), currency)
}

/// Render an amount in the currency's display format, e.g. `R$ 1.234,56`
pub fn format(amount: Amount, currency: &Currency) -> String {
    let per_major = currency.minor_per_major().unsigned_abs();
    let abs = amount.minor().unsigned_abs();
    let sign = if amount.minor() < 0 { "-" } else { "" };
    let number = format!(
        "{}{}{}{:0width$}",
        sign,
        group_thousands(abs / per_major, currency.delimiter),
        currency.separator,
        abs % per_major,
        width = currency.precision as usize
    );
    currency
        .format
        .replace("%u", currency.symbol)
        .replace("%n", &number)
}

/// Parse a displayed amount back into minor units.
///
/// The symbol, thousands delimiters and whitespace are dropped and the
/// currency's separator is read as the decimal point, so with BRL both
/// `R$ 1.234,56` and `1234,56` parse to 123456.
pub fn parse(input: &str, currency: &Currency) -> Result<Amount, MaskError> {
    let stripped = input.replace(currency.symbol, "");
    let cleaned: String = stripped
        .chars()
        .filter(|c| !c.is_whitespace() && *c != currency.delimiter)
        .map(|c| if c == currency.separator { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Err(MaskError::Empty);
    }

    let invalid = || MaskError::Invalid(input.to_string());
    let (negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let precision = currency.precision as usize;
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty())
        || !all_digits(whole)
        || !all_digits(fraction)
        || fraction.len() > precision
    {
        return Err(invalid());
    }

    let overflow = || MaskError::Overflow(input.to_string());
    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<precision$}", fraction)
            .parse()
            .map_err(|_| invalid())?
    };
    let minor = whole
        .checked_mul(currency.minor_per_major())
        .and_then(|m| m.checked_add(fraction))
        .ok_or_else(overflow)?;
    Ok(Amount(if negative { -minor } else { minor }))
}

fn group_thousands(n: u64, delimiter: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(delimiter);
        }
        out.push(c);
    }
    out
}
