use crate::method::Method0;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CoinsListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<RankedCoin>,
}

/// Upstream sends `"data": null` when it has nothing to rank.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One coin of the ranking list.
///
/// Only `symbol` is typed; every other field (`alt_rank`, `galaxy_score`,
/// `sentiment`, their `_previous` variants, ...) is kept as-is so any of them
/// can be used as a ranking metric.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RankedCoin {
    #[serde(default)]
    pub symbol: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RankedCoin {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            fields: Map::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Raw numeric value of `field`. Numeric strings are accepted.
    pub fn field(&self, field: &str) -> Option<f64> {
        let value = match self.fields.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Value of `metric`, falling back to the derived `<field>_perc` change
    /// metrics when the record has no such field.
    ///
    /// `alt_rank` improves as it goes down, so its change is measured from the
    /// previous value; every other field measures growth over the previous one.
    pub fn metric(&self, metric: &str) -> Option<f64> {
        if let Some(value) = self.field(metric) {
            return Some(value);
        }

        let base = metric.strip_suffix("_perc")?;
        let current = self.field(base)?;
        let previous = self.field(&format!("{base}_previous"))?;
        if previous == 0.0 {
            return None;
        }

        let change = if base == "alt_rank" {
            (previous - current) / previous
        } else {
            (current - previous) / previous
        };
        Some(change)
    }
}

pub struct CoinsList;

impl Method0 for CoinsList {
    const PATH: &'static str = "/public/coins/list/v1";
    type Response = CoinsListResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_unknown_fields_for_ranking() {
        let coin: RankedCoin = serde_json::from_str(
            r#"{"id":1,"symbol":"BTC","alt_rank":3,"galaxy_score":"71.5","topic":"bitcoin"}"#,
        )
        .expect("parse");

        assert_eq!(coin.symbol, "BTC");
        assert_eq!(coin.metric("alt_rank"), Some(3.0));
        assert_eq!(coin.metric("galaxy_score"), Some(71.5));
        assert_eq!(coin.metric("topic"), None);
        assert_eq!(coin.metric("sentiment"), None);
    }

    #[test]
    fn derives_percentage_change_metrics() {
        let coin = RankedCoin::new("ETH")
            .with("alt_rank", 50)
            .with("alt_rank_previous", 100)
            .with("galaxy_score", 60)
            .with("galaxy_score_previous", 50);

        assert_eq!(coin.metric("alt_rank_perc"), Some(0.5));
        assert_eq!(coin.metric("galaxy_score_perc"), Some(0.2));
    }

    #[test]
    fn change_metrics_need_a_nonzero_previous_value() {
        let coin = RankedCoin::new("SOL")
            .with("galaxy_score", 60)
            .with("galaxy_score_previous", 0);

        assert_eq!(coin.metric("galaxy_score_perc"), None);
        assert_eq!(coin.metric("alt_rank_perc"), None);
    }

    #[test]
    fn empty_payload_deserializes_to_empty_list() {
        let response: CoinsListResponse = serde_json::from_str("{}").expect("parse");
        assert!(response.data.is_empty());
    }

    #[test]
    fn null_data_deserializes_to_empty_list() {
        let response: CoinsListResponse = serde_json::from_str(r#"{"data":null}"#).expect("parse");
        assert!(response.data.is_empty());
    }
}
