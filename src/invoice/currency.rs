use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Pkr,
    Eur,
    Gbp,
    Cad,
    Jpy,
    Inr,
}

impl Currency {
    /// Order matches the currency picker on the invoice form.
    pub const ALL: [Currency; 7] = [
        Currency::Usd,
        Currency::Pkr,
        Currency::Eur,
        Currency::Gbp,
        Currency::Cad,
        Currency::Jpy,
        Currency::Inr,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Pkr => "PKR",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Jpy => "JPY",
            Currency::Inr => "INR",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Pkr
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ValidationError::UnknownCurrency(s.to_string()))
    }
}
