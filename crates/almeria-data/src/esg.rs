//! Placeholder ESG scores for demonstrations.

use crate::Result;
use almeria_features::EsgTable;
use almeria_traits::Ticker;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lower bound of generated scores.
pub const MIN_SAMPLE_SCORE: f64 = 0.4;

/// Upper bound (exclusive) of generated scores.
pub const MAX_SAMPLE_SCORE: f64 = 0.9;

/// Draw one score per ticker uniformly from `[0.4, 0.9)`.
///
/// The same tickers and seed always give the same table.
///
/// # Errors
///
/// Returns an error if a ticker is listed twice.
pub fn sample_esg_scores(tickers: &[Ticker], seed: u64) -> Result<EsgTable> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pairs: Vec<(Ticker, f64)> = tickers
        .iter()
        .map(|ticker| {
            (
                ticker.clone(),
                rng.gen_range(MIN_SAMPLE_SCORE..MAX_SAMPLE_SCORE),
            )
        })
        .collect();
    Ok(EsgTable::from_pairs(pairs)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers() -> Vec<Ticker> {
        ["AAPL", "MSFT", "XOM", "BRK_B"]
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_scores_in_range() {
        let table = sample_esg_scores(&tickers(), 42).unwrap();
        assert_eq!(table.len(), 4);
        for (_, score) in table.iter() {
            assert!((MIN_SAMPLE_SCORE..MAX_SAMPLE_SCORE).contains(&score));
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = sample_esg_scores(&tickers(), 7).unwrap();
        let b = sample_esg_scores(&tickers(), 7).unwrap();
        let c = sample_esg_scores(&tickers(), 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_duplicate_ticker_rejected() {
        let tickers = vec!["A".to_string(), "A".to_string()];
        assert!(sample_esg_scores(&tickers, 1).is_err());
    }
}
