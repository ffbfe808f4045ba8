use async_trait::async_trait;

use crate::errors::CoreError;

/// Trait abstraction for all market-data providers.
///
/// A provider answers one question: what is the latest price of this quote
/// symbol? Equities, crypto pairs ("BTC-USD") and exchange rates ("USDTWD=X")
/// all go through the same call. If an API stops working or changes, only
/// that one implementation is replaced.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the latest price for a provider-specific quote symbol,
    /// in that symbol's own trading currency.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError>;
}
