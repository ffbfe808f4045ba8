use std::collections::BTreeSet;

use crate::errors::CoreError;
use crate::models::asset::{Asset, AssetCategory};
use crate::models::rates::RateTable;
use crate::models::refresh::{FetchFailure, PriceFetch, RateFetch};
use crate::providers::registry::QuoteProviderRegistry;

/// Exchange suffix appended to domestic tickers that carry none (2330 → 2330.TW).
const DOMESTIC_EXCHANGE_SUFFIX: &str = ".TW";

/// Fetches asset prices and exchange rates from quote providers.
///
/// Both fetches are best effort: each rate and each asset is requested on its
/// own, and a failure only marks that one item as failed. Nothing here mutates
/// holdings; callers merge the results.
pub struct PriceService {
    registry: QuoteProviderRegistry,
}

impl PriceService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    /// Check if at least one provider is registered.
    pub fn has_providers(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Names of the registered providers, in fallback order.
    pub fn get_provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// The provider symbol for an asset, or `None` for cash (valued from rates).
    pub fn quote_symbol(asset: &Asset, reference_currency: &str) -> Option<String> {
        let symbol = asset.symbol.as_str();
        match asset.category {
            AssetCategory::DomesticEquity if !symbol.contains('.') => {
                Some(format!("{symbol}{DOMESTIC_EXCHANGE_SUFFIX}"))
            }
            AssetCategory::Crypto if !symbol.contains('-') => {
                Some(format!("{symbol}-{reference_currency}"))
            }
            AssetCategory::DomesticEquity
            | AssetCategory::ForeignEquity
            | AssetCategory::Crypto => Some(symbol.to_string()),
            AssetCategory::CashOrLiability => None,
        }
    }

    /// The provider symbol of an exchange rate into the home currency.
    pub fn rate_symbol(currency: &str, home_currency: &str) -> String {
        format!("{}{}=X", currency.to_uppercase(), home_currency.to_uppercase())
    }

    /// Currencies to fetch on a refresh: the tracked ones plus those of held
    /// cash, minus the home currency. Sorted, deduplicated.
    pub fn currencies_to_fetch(
        tracked: &[String],
        assets: &[Asset],
        home_currency: &str,
    ) -> Vec<String> {
        let home = home_currency.to_uppercase();
        let held_cash = assets
            .iter()
            .filter(|a| a.category == AssetCategory::CashOrLiability)
            .map(|a| a.symbol.clone());

        tracked
            .iter()
            .map(|c| c.to_uppercase())
            .chain(held_cash)
            .filter(|c| *c != home && !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Fetch the latest price for a quote symbol.
    ///
    /// Tries providers in registration order. A price that is not finite or is
    /// negative counts as a failure and the next provider is tried.
    pub async fn get_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider(symbol.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_current_price(symbol).await {
                Ok(price) if price.is_finite() && price >= 0.0 => return Ok(price),
                Ok(price) => {
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!(
                            "Invalid price returned for {symbol}: {price} (must be finite and non-negative)"
                        ),
                    });
                }
                Err(e) => {
                    log::debug!("{} failed for {symbol}: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(symbol.to_string())))
    }

    /// Fetch rates into the home currency, one request per currency.
    pub async fn fetch_rates(&self, currencies: &[String], home_currency: &str) -> RateFetch {
        let mut fetch = RateFetch::default();

        for currency in currencies {
            if currency.eq_ignore_ascii_case(home_currency) {
                continue;
            }
            let symbol = Self::rate_symbol(currency, home_currency);
            fetch.requested += 1;

            match self.get_price(&symbol).await {
                Ok(rate) if rate > 0.0 => {
                    fetch.rates.insert(currency.to_uppercase(), rate);
                }
                Ok(rate) => {
                    log::warn!("Ignoring non-positive rate for {currency}: {rate}");
                    fetch.failures.push(FetchFailure {
                        symbol,
                        message: format!("non-positive rate {rate}"),
                    });
                }
                Err(e) => {
                    log::warn!("Failed to fetch rate for {currency}: {e}");
                    fetch.failures.push(FetchFailure {
                        symbol,
                        message: e.to_string(),
                    });
                }
            }
        }

        fetch
    }

    /// Fetch current prices for all holdings, one request per tradable asset.
    /// Crypto pairs are quoted against `reference_currency`.
    ///
    /// Cash is resolved from `rates` without a request: the home currency gets
    /// `1.0`, a currency with a known rate gets that rate, anything else keeps
    /// its previous price.
    pub async fn fetch_prices(
        &self,
        assets: &[Asset],
        rates: &RateTable,
        reference_currency: &str,
    ) -> PriceFetch {
        let mut fetch = PriceFetch::default();
        let home = rates.home_currency().to_string();

        for asset in assets {
            if asset.category == AssetCategory::CashOrLiability {
                if asset.symbol == home {
                    fetch.prices.insert(asset.id, 1.0);
                } else if let Some(rate) = rates.get(&asset.symbol) {
                    fetch.prices.insert(asset.id, rate);
                }
                continue;
            }

            let Some(symbol) = Self::quote_symbol(asset, reference_currency) else {
                continue;
            };
            fetch.requested += 1;

            match self.get_price(&symbol).await {
                Ok(price) => {
                    fetch.prices.insert(asset.id, price);
                }
                Err(e) => {
                    log::warn!("Failed to fetch price for {symbol}: {e}");
                    fetch.failures.push(FetchFailure {
                        symbol,
                        message: e.to_string(),
                    });
                }
            }
        }

        fetch
    }
}
