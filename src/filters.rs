//! Threshold filter applied to every fetched pair

use crate::config::FilterConfig;
use crate::market_data::PairRecord;

/// Minimum liquidity and market-cap gate
///
/// Thresholds are copied in at start and never change during a run.
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine {
    min_liquidity: f64,
    min_market_cap: f64,
}

impl FilterEngine {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            min_liquidity: config.min_liquidity,
            min_market_cap: config.min_market_cap,
        }
    }

    /// True iff liquidity and fdv both meet or exceed their thresholds
    ///
    /// Absent values were already coerced to zero by the parser.
    pub fn passes(&self, pair: &PairRecord) -> bool {
        let liquidity = pair.liquidity_usd();
        let market_cap = pair.fdv;

        let passed = liquidity >= self.min_liquidity && market_cap >= self.min_market_cap;
        if !passed {
            log::debug!(
                "Filtered out {}: liquidity={:.2} (min {:.2}), fdv={:.2} (min {:.2})",
                pair.symbol(),
                liquidity,
                self.min_liquidity,
                market_cap,
                self.min_market_cap
            );
        }
        passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Liquidity;

    fn engine() -> FilterEngine {
        FilterEngine::new(FilterConfig {
            min_liquidity: 10_000.0,
            min_market_cap: 1_000_000.0,
        })
    }

    fn pair(liquidity: Option<f64>, fdv: f64) -> PairRecord {
        PairRecord {
            liquidity: liquidity.map(|usd| Liquidity { usd }),
            fdv,
            ..Default::default()
        }
    }

    #[test]
    fn test_passes_above_both_thresholds() {
        assert!(engine().passes(&pair(Some(50_000.0), 2_000_000.0)));
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        assert!(engine().passes(&pair(Some(10_000.0), 1_000_000.0)));
    }

    #[test]
    fn test_low_liquidity_rejected() {
        assert!(!engine().passes(&pair(Some(9_999.99), 5_000_000.0)));
    }

    #[test]
    fn test_low_market_cap_rejected() {
        assert!(!engine().passes(&pair(Some(1_000_000.0), 999_999.0)));
    }

    #[test]
    fn test_missing_liquidity_reads_as_zero() {
        assert!(!engine().passes(&pair(None, 5_000_000.0)));

        let permissive = FilterEngine::new(FilterConfig {
            min_liquidity: 0.0,
            min_market_cap: 0.0,
        });
        assert!(permissive.passes(&pair(None, 0.0)));
    }
}
