use bon::Builder;
use pairlist_lunarcrush::RankedCoin;
use pairlist_shared_models::SortDirection;
use std::cmp::Ordering;

pub const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(on(String, into))]
pub struct RankOptions {
    /// Coin field to rank by, e.g. `alt_rank` or `galaxy_score`.
    pub metric: String,
    #[builder(default)]
    pub direction: SortDirection,
    /// Inclusive lower bound on the metric.
    pub min: Option<f64>,
    /// Inclusive upper bound on the metric.
    pub max: Option<f64>,
    #[builder(default = DEFAULT_LIMIT)]
    pub limit: usize,
}

impl RankOptions {
    fn in_bounds(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Orders exchange pairs by the coins' ranking metric.
///
/// Coins without the metric or outside `[min, max]` are dropped, the rest are
/// stably sorted (ties keep their upstream order) and each is matched to the
/// first pair whose base asset equals its symbol. Coins the exchange does not
/// list are skipped before the limit is applied.
pub fn rank(pairs: &[String], coins: &[RankedCoin], options: &RankOptions) -> Vec<String> {
    let mut ranked: Vec<(f64, &str)> = coins
        .iter()
        .filter_map(|coin| coin.metric(&options.metric).map(|value| (value, coin.symbol.as_str())))
        .filter(|&(value, _)| options.in_bounds(value))
        .collect();

    ranked.sort_by(|a, b| {
        let ordering = a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
        match options.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    ranked
        .into_iter()
        .filter_map(|(_, symbol)| {
            let prefix = format!("{symbol}/");
            pairs.iter().find(|pair| pair.starts_with(&prefix))
        })
        .take(options.limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[&str]) -> Vec<String> {
        items.iter().map(|p| p.to_string()).collect()
    }

    fn coins() -> Vec<RankedCoin> {
        vec![
            RankedCoin::new("BTC").with("alt_rank", 3).with("galaxy_score", 90),
            RankedCoin::new("ETH").with("alt_rank", 1).with("galaxy_score", 95),
            RankedCoin::new("DOGE").with("alt_rank", 2).with("galaxy_score", 85),
            RankedCoin::new("SOL").with("alt_rank", 4).with("galaxy_score", 80),
        ]
    }

    fn by(metric: &str) -> RankOptions {
        RankOptions::builder().metric(metric).build()
    }

    #[test]
    fn ranks_full_intersection_by_alt_rank() {
        let result = rank(&pairs(&["BTC/USDT", "ETH/USDT", "DOGE/USDT", "SOL/USDT"]), &coins(), &by("alt_rank"));
        assert_eq!(result, pairs(&["ETH/USDT", "DOGE/USDT", "BTC/USDT", "SOL/USDT"]));
    }

    #[test]
    fn drops_coins_the_exchange_does_not_list() {
        let result = rank(&pairs(&["BTC/USDT", "ETH/USDT"]), &coins(), &by("alt_rank"));
        assert_eq!(result, pairs(&["ETH/USDT", "BTC/USDT"]));
    }

    #[test]
    fn no_overlap_yields_nothing() {
        assert!(rank(&pairs(&["XRP/USDT"]), &coins(), &by("alt_rank")).is_empty());
    }

    #[test]
    fn descending_puts_highest_first() {
        let options = RankOptions::builder()
            .metric("galaxy_score")
            .direction(SortDirection::Descending)
            .build();
        let result = rank(&pairs(&["SOL/USDT", "DOGE/USDT", "ETH/USDT", "BTC/USDT"]), &coins(), &options);
        assert_eq!(result, pairs(&["ETH/USDT", "BTC/USDT", "DOGE/USDT", "SOL/USDT"]));
    }

    #[test]
    fn bounds_are_inclusive() {
        let options = RankOptions::builder().metric("alt_rank").min(2.0).max(3.0).build();
        let result = rank(&pairs(&["BTC/USDT", "ETH/USDT", "DOGE/USDT", "SOL/USDT"]), &coins(), &options);
        assert_eq!(result, pairs(&["DOGE/USDT", "BTC/USDT"]));
    }

    #[test]
    fn limit_applies_after_matching() {
        let options = RankOptions::builder().metric("alt_rank").limit(1).build();
        // ETH ranks first but is not listed, so BTC takes the only slot.
        let result = rank(&pairs(&["BTC/USDT", "SOL/USDT"]), &coins(), &options);
        assert_eq!(result, pairs(&["BTC/USDT"]));
    }

    #[test]
    fn ties_keep_upstream_order_in_both_directions() {
        let tied = vec![
            RankedCoin::new("AAA").with("sentiment", 70),
            RankedCoin::new("BBB").with("sentiment", 70),
            RankedCoin::new("CCC").with("sentiment", 90),
        ];
        let listed = pairs(&["CCC/USDT", "BBB/USDT", "AAA/USDT"]);

        assert_eq!(
            rank(&listed, &tied, &by("sentiment")),
            pairs(&["AAA/USDT", "BBB/USDT", "CCC/USDT"])
        );

        let desc = RankOptions::builder()
            .metric("sentiment")
            .direction(SortDirection::Descending)
            .build();
        assert_eq!(rank(&listed, &tied, &desc), pairs(&["CCC/USDT", "AAA/USDT", "BBB/USDT"]));
    }

    #[test]
    fn coins_without_the_metric_are_filtered_out() {
        let mixed = vec![
            RankedCoin::new("BTC").with("alt_rank", 2),
            RankedCoin::new("ETH"),
            RankedCoin::new("SOL").with("alt_rank", "1"),
        ];
        let result = rank(&pairs(&["BTC/USDT", "ETH/USDT", "SOL/USDT"]), &mixed, &by("alt_rank"));
        assert_eq!(result, pairs(&["SOL/USDT", "BTC/USDT"]));
    }

    #[test]
    fn first_listed_variant_wins() {
        let listed = pairs(&["ETH/USDT:USDT", "ETH/USDT"]);
        let result = rank(&listed, &coins(), &by("alt_rank"));
        assert_eq!(result, pairs(&["ETH/USDT:USDT"]));
    }

    #[test]
    fn symbol_must_match_whole_base_asset() {
        let listed = pairs(&["ETHW/USDT", "SOLO/USDT"]);
        assert!(rank(&listed, &coins(), &by("alt_rank")).is_empty());
    }
}
