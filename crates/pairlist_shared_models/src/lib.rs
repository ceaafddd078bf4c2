use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market category requested by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Spot,
    Futures,
}

impl MarketType {
    /// The exchange-side contract kind that backs this market type.
    pub fn kind(self) -> MarketKind {
        match self {
            MarketType::Spot => MarketKind::Spot,
            MarketType::Futures => MarketKind::Swap,
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketType::Spot => write!(f, "spot"),
            MarketType::Futures => write!(f, "futures"),
        }
    }
}

impl FromStr for MarketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spot" => Ok(MarketType::Spot),
            "futures" => Ok(MarketType::Futures),
            _ => Err(s.to_string()),
        }
    }
}

/// Contract kind as reported by an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Spot,
    /// Perpetual contract.
    Swap,
    /// Dated delivery contract.
    Future,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub base: String,
    pub quote: String,
    pub kind: MarketKind,
    pub active: bool,
}

impl MarketRecord {
    pub fn new(base: impl Into<String>, quote: impl Into<String>, kind: MarketKind, active: bool) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
            kind,
            active,
        }
    }

    /// Canonical pair string: `BASE/QUOTE`, or `BASE/QUOTE:QUOTE` for futures.
    pub fn pair(&self, market_type: MarketType) -> String {
        match market_type {
            MarketType::Spot => format!("{}/{}", self.base, self.quote),
            MarketType::Futures => format!("{}/{}:{}", self.base, self.quote, self.quote),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_market_types() {
        assert_eq!("spot".parse::<MarketType>(), Ok(MarketType::Spot));
        assert_eq!("FUTURES".parse::<MarketType>(), Ok(MarketType::Futures));
        assert_eq!("margin".parse::<MarketType>(), Err("margin".to_string()));
    }

    #[test]
    fn futures_pairs_carry_settlement_suffix() {
        let record = MarketRecord::new("BTC", "USDT", MarketKind::Swap, true);
        assert_eq!(record.pair(MarketType::Futures), "BTC/USDT:USDT");
        assert_eq!(record.pair(MarketType::Spot), "BTC/USDT");
    }

    #[test]
    fn sort_direction_accepts_short_and_long_forms() {
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Descending));
        assert_eq!("Ascending".parse::<SortDirection>(), Ok(SortDirection::Ascending));
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
