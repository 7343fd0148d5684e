use std::fmt;

/// Error returned for ISO codes outside the supported table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

/// Display rules for one currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub iso_code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Decimal separator
    pub separator: char,
    /// Thousands delimiter
    pub delimiter: char,
    /// `%u` is replaced by the symbol, `%n` by the number
    pub format: &'static str,
    pub precision: u32,
}

pub const BRL: Currency = Currency {
    iso_code: "BRL",
    name: "Brazilian Real",
    symbol: "R$",
    separator: ',',
    delimiter: '.',
    format: "%u %n",
    precision: 2,
};

pub const USD: Currency = Currency {
    iso_code: "USD",
    name: "US Dollar",
    symbol: "$",
    separator: '.',
    delimiter: ',',
    format: "%u%n",
    precision: 2,
};

pub const EUR: Currency = Currency {
    iso_code: "EUR",
    name: "Euro",
    symbol: "€",
    separator: ',',
    delimiter: '.',
    format: "%u %n",
    precision: 2,
};

const CURRENCIES: [Currency; 3] = [BRL, USD, EUR];

impl Currency {
    /// Find a currency by ISO code (case-insensitive)
    pub fn lookup(iso_code: &str) -> Result<&'static Currency, UnknownCurrency> {
        CURRENCIES
            .iter()
            .find(|c| c.iso_code.eq_ignore_ascii_case(iso_code))
            .ok_or_else(|| UnknownCurrency(iso_code.to_string()))
    }

    /// Number of minor units in one major unit (100 for precision 2)
    pub fn minor_per_major(&self) -> i64 {
        10i64.pow(self.precision)
    }
}

/// A monetary amount in minor units (cents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(pub i64);

impl Amount {
    pub fn minor(self) -> i64 {
        self.0
    }
}

/// Plain decimal rendering (`1234.56`), independent of any currency
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
