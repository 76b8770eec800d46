use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Currencies offered in the settings menu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    Uah,
    Usd,
    Eur,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Uah, Currency::Usd, Currency::Eur];

    /// ISO 4217 code, also the persisted representation.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Uah => "UAH",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Uah => "₴",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unsupported currency `{}`", value))
    }
}

/// Renders `value` with exactly `digits` fractional digits.
pub fn format_amount(value: f64, digits: usize) -> String {
    format!("{:.*}", digits, value)
}

/// Two-decimal amount followed by the currency code, e.g. `150.00 UAH`.
pub fn format_money(value: f64, currency: Currency) -> String {
    format!("{} {}", format_amount(value, 2), currency.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_round_to_requested_digits() {
        assert_eq!(format_amount(150.0, 2), "150.00");
        assert_eq!(format_amount(2.345, 1), "2.3");
        assert_eq!(format_amount(7.6, 0), "8");
    }

    #[test]
    fn money_uses_currency_code() {
        assert_eq!(format_money(12.0, Currency::Eur), "12.00 EUR");
    }

    #[test]
    fn currency_codes_parse_case_insensitively() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("GBP".parse::<Currency>().is_err());
    }
}
