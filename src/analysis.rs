//! Descriptive statistics over stored observations
//!
//! Produces three views: the full table, stats over rugged tokens, and
//! stats over bundled-supply tokens. Statistics per numeric column are
//! count, mean, sample std, min, quartiles (linear interpolation) and max.

use crate::db::TokenObservation;

/// Numeric columns summarized in every `Describe`
pub const NUMERIC_COLUMNS: [&str; 3] = ["price", "liquidity", "market_cap"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` below two values
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub columns: Vec<(&'static str, ColumnStats)>,
}

impl Describe {
    pub fn count(&self) -> usize {
        self.columns.first().map(|(_, s)| s.count).unwrap_or(0)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|(n, _)| *n == name).map(|(_, s)| s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub observations: Vec<TokenObservation>,
    pub rugged: Describe,
    pub bundled: Describe,
}

pub fn analyze(observations: Vec<TokenObservation>) -> AnalysisReport {
    let rugged: Vec<&TokenObservation> = observations.iter().filter(|o| o.is_rugged).collect();
    let bundled: Vec<&TokenObservation> =
        observations.iter().filter(|o| o.is_bundled_supply).collect();

    let rugged = describe(&rugged);
    let bundled = describe(&bundled);

    AnalysisReport {
        observations,
        rugged,
        bundled,
    }
}

pub fn describe(rows: &[&TokenObservation]) -> Describe {
    let columns = NUMERIC_COLUMNS
        .iter()
        .map(|&name| {
            let values: Vec<f64> = rows.iter().map(|o| column_value(o, name)).collect();
            (name, describe_column(&values))
        })
        .collect();

    Describe { columns }
}

fn column_value(observation: &TokenObservation, column: &str) -> f64 {
    match column {
        "price" => observation.price,
        "liquidity" => observation.liquidity,
        _ => observation.market_cap,
    }
}

pub fn describe_column(values: &[f64]) -> ColumnStats {
    let count = values.len();
    if count == 0 {
        return ColumnStats::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    });

    ColumnStats {
        count,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        p25: Some(quantile(&sorted, 0.25)),
        p50: Some(quantile(&sorted, 0.50)),
        p75: Some(quantile(&sorted, 0.75)),
        max: sorted.last().copied(),
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(price: f64, liquidity: f64, rugged: bool, bundled: bool) -> TokenObservation {
        TokenObservation {
            id: None,
            symbol: "T".to_string(),
            name: "Token".to_string(),
            price,
            liquidity,
            market_cap: price * 1000.0,
            is_cex_listed: false,
            is_rugged: rugged,
            is_pumped: false,
            is_fake_volume: false,
            dev_address: String::new(),
            is_bundled_supply: bundled,
            audit_status: "Good".to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_describe_column_quartiles() {
        let stats = describe_column(&[4.0, 1.0, 3.0, 2.0]);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, Some(2.5));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.p25, Some(1.75));
        assert_eq!(stats.p50, Some(2.5));
        assert_eq!(stats.p75, Some(3.25));
        assert_eq!(stats.max, Some(4.0));

        let std = stats.std.unwrap();
        assert!((std - 1.2909944).abs() < 1e-6);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let stats = describe_column(&[7.0]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, None);
        assert_eq!(stats.p25, Some(7.0));
    }

    #[test]
    fn test_empty_subset() {
        let stats = describe_column(&[]);
        assert_eq!(stats, ColumnStats::default());
    }

    #[test]
    fn test_analyze_splits_subsets() {
        let report = analyze(vec![
            obs(0.0, 0.0, true, false),
            obs(1.0, 100.0, false, true),
            obs(3.0, 300.0, false, true),
            obs(2.0, 200.0, false, false),
        ]);

        assert_eq!(report.observations.len(), 4);
        assert_eq!(report.rugged.count(), 1);
        assert_eq!(report.bundled.count(), 2);
        assert_eq!(report.bundled.column("liquidity").unwrap().mean, Some(200.0));
        assert_eq!(report.bundled.column("market_cap").unwrap().max, Some(3000.0));
    }
}
