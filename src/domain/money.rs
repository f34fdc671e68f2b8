use std::fmt;

/// Money is stored as integer cents so arithmetic stays exact.
/// 1 unit = 100 cents, so a balance of 1000.00 is 100000 cents.
pub type Cents = i64;

/// Format cents for display.
/// Example: 90000 -> "900.00", -10000 -> "-100.00"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a decimal amount string into cents.
///
/// Accepts whole units ("100") or up to two decimal places ("100.5",
/// "100.50"). Amounts at the boundary are always unsigned; the sign of a
/// stored amount is assigned by the charge protocol, so a leading minus is
/// rejected here rather than silently accepted.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if input.starts_with('-') {
        return Err(ParseCentsError::Negative);
    }

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (input, ""),
    };

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::InvalidFormat)?
    };

    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        // "100.5" means 50 cents
        1 => {
            decimal_str
                .parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        2 => decimal_str.parse().map_err(|_| ParseCentsError::InvalidFormat)?,
        // Sub-cent precision would be silently lost; refuse it.
        _ => return Err(ParseCentsError::TooPrecise),
    };

    Ok(units * 100 + decimal_cents)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Negative,
    TooPrecise,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Negative => write!(f, "amount must not be negative"),
            ParseCentsError::TooPrecise => write!(f, "amounts support at most two decimal places"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
