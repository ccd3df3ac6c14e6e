//! Remote quote abstractions

use crate::core::series::Observation;
use anyhow::Result;
use async_trait::async_trait;

/// An intraday quote for one fund, not yet a confirmed closing figure.
#[derive(Debug, Clone)]
pub struct TodayQuote {
    pub code: String,
    pub observation: Observation,
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Daily price/share-amount history for one fund, ascending by date.
    async fn fetch_history(&self, code: &str) -> Result<Vec<Observation>>;

    /// Intraday quotes for the given fund codes. Empty at or after the
    /// market-close cutoff hour, when the day's figures are final.
    async fn fetch_today(&self, codes: &[String]) -> Result<Vec<TodayQuote>>;
}
