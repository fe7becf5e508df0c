//! Bar source trait definitions.

use crate::error::DataError;
use crate::types::{Bar, Timeframe};
use async_trait::async_trait;

/// Collaborator that acquires recent bars for one instrument.
///
/// Implementations are handed to the polling loop explicitly; the
/// signal pipeline itself never talks to a source.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Fetch up to `limit` of the most recent bars.
    ///
    /// # Returns
    /// Bars ordered from oldest to newest
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}
