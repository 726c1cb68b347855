use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tariffs::TariffError;

/// Billing class determining which band rates apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerCategory {
    Residential,
    Commercial,
    Public,
    Industrial,
    Social,
    Vulnerable,
}

impl ConsumerCategory {
    pub const ALL: [ConsumerCategory; 6] = [
        ConsumerCategory::Residential,
        ConsumerCategory::Commercial,
        ConsumerCategory::Public,
        ConsumerCategory::Industrial,
        ConsumerCategory::Social,
        ConsumerCategory::Vulnerable,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ConsumerCategory::Residential => "residential",
            ConsumerCategory::Commercial => "commercial",
            ConsumerCategory::Public => "public",
            ConsumerCategory::Industrial => "industrial",
            ConsumerCategory::Social => "social",
            ConsumerCategory::Vulnerable => "vulnerable",
        }
    }

    /// Residential-like categories bill over four bands; the rest over two.
    pub const fn is_residential_like(self) -> bool {
        matches!(
            self,
            ConsumerCategory::Residential | ConsumerCategory::Social | ConsumerCategory::Vulnerable
        )
    }
}

impl std::fmt::Display for ConsumerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ConsumerCategory {
    type Err = TariffError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "residential" | "residencial" => Ok(ConsumerCategory::Residential),
            "commercial" | "comercial" => Ok(ConsumerCategory::Commercial),
            "public" | "publica" | "publico" => Ok(ConsumerCategory::Public),
            "industrial" => Ok(ConsumerCategory::Industrial),
            "social" => Ok(ConsumerCategory::Social),
            "vulnerable" | "vulneravel" => Ok(ConsumerCategory::Vulnerable),
            other => Err(TariffError::UnknownCategory(other.to_string())),
        }
    }
}

/// Sewage surcharge rate chosen by the customer. Only these three levels
/// exist in the published rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SewagePercent {
    Eighty,
    Ninety,
    Full,
}

impl SewagePercent {
    pub fn from_number(value: u32) -> Option<Self> {
        match value {
            80 => Some(SewagePercent::Eighty),
            90 => Some(SewagePercent::Ninety),
            100 => Some(SewagePercent::Full),
            _ => None,
        }
    }

    pub fn factor(self) -> Decimal {
        match self {
            SewagePercent::Eighty => Decimal::new(8, 1),
            SewagePercent::Ninety => Decimal::new(9, 1),
            SewagePercent::Full => Decimal::ONE,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SewagePercent::Eighty => "80%",
            SewagePercent::Ninety => "90%",
            SewagePercent::Full => "100%",
        }
    }
}

/// A computed water charge together with the inputs that produced it. This is
/// also the per-session pending state while the customer decides on the
/// sewage surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterCharge {
    pub volume: u32,
    pub category: ConsumerCategory,
    pub tariff_year: u16,
    pub amount: Decimal,
}

/// Water + sewage breakdown produced once a surcharge level is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub water: Decimal,
    pub percent: SewagePercent,
    pub sewage: Decimal,
    pub total: Decimal,
}
