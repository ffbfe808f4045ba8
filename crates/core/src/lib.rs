pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use models::{
    asset::{Asset, AssetCategory},
    chart::{ChartData, ChartFilter},
    portfolio::Portfolio,
    rates::RateTable,
    refresh::{RefreshFlag, RefreshReport},
    settings::Settings,
    valuation::{AssetValuation, DashboardStats, PortfolioTotals},
};
use providers::registry::QuoteProviderRegistry;
use services::{
    chart_service::ChartService, portfolio_service::PortfolioService,
    price_service::PriceService, valuation_service::ValuationService,
};
use storage::{
    manager::StorageManager,
    store::{KeyValueStore, MemoryStore},
};
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Asset Tracker core library.
/// Holds the application state and all services needed to operate on it.
///
/// The holdings list is the only persisted state. Every mutation is written to
/// the store before it becomes visible; a failed write changes nothing.
#[must_use]
pub struct AssetTracker {
    portfolio: Portfolio,
    store: Box<dyn KeyValueStore>,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    valuation_service: ValuationService,
    chart_service: ChartService,
    refresh_flag: RefreshFlag,
    last_refreshed: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for AssetTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetTracker")
            .field("assets", &self.portfolio.assets.len())
            .field("rates", &self.portfolio.rates.len())
            .field("settings", &self.portfolio.settings)
            .field("refreshing", &self.refresh_flag.is_active())
            .field("last_refreshed", &self.last_refreshed)
            .finish()
    }
}

impl AssetTracker {
    /// Create a tracker backed by an in-memory store.
    pub fn create_new(settings: Settings) -> Result<Self, CoreError> {
        Self::open(Box::new(MemoryStore::new()), settings)
    }

    /// Open a tracker over an existing store, using the default quote providers.
    ///
    /// Corrupt stored data is logged and discarded; the tracker starts empty.
    pub fn open(store: Box<dyn KeyValueStore>, settings: Settings) -> Result<Self, CoreError> {
        let settings = settings.validate()?;
        let registry = QuoteProviderRegistry::new_with_defaults(&settings);
        Self::with_price_service(store, settings, PriceService::new(registry))
    }

    /// Open a tracker with a caller-supplied price service (custom providers, tests).
    pub fn with_price_service(
        store: Box<dyn KeyValueStore>,
        settings: Settings,
        price_service: PriceService,
    ) -> Result<Self, CoreError> {
        let settings = settings.validate()?;
        let assets = StorageManager::load_assets(store.as_ref());
        let portfolio = Portfolio::with_assets(settings, assets);
        Ok(Self::build(portfolio, store, price_service))
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Add a holding. Its price stays unknown until the next refresh.
    pub fn add_asset(
        &mut self,
        category: AssetCategory,
        symbol: &str,
        quantity: f64,
        unit_cost: f64,
    ) -> Result<Uuid, CoreError> {
        let mut next = self.portfolio.clone();
        let id = self
            .portfolio_service
            .add_asset(&mut next, category, symbol, quantity, unit_cost)?;
        self.commit(next)?;
        Ok(id)
    }

    /// Add a holding from raw form input. Every field is required and both
    /// numbers must parse; nothing is stored otherwise.
    pub fn add_asset_from_input(
        &mut self,
        category: AssetCategory,
        symbol: &str,
        quantity: &str,
        unit_cost: &str,
    ) -> Result<Uuid, CoreError> {
        if symbol.trim().is_empty() {
            return Err(CoreError::ValidationError("symbol is required".into()));
        }
        let quantity = PortfolioService::parse_number("quantity", quantity)?;
        let unit_cost = PortfolioService::parse_number("cost", unit_cost)?;
        self.add_asset(category, symbol, quantity, unit_cost)
    }

    /// Change quantity and cost of a holding.
    pub fn edit_asset(
        &mut self,
        asset_id: Uuid,
        quantity: f64,
        unit_cost: f64,
    ) -> Result<(), CoreError> {
        let mut next = self.portfolio.clone();
        self.portfolio_service
            .edit_asset(&mut next, asset_id, quantity, unit_cost)?;
        self.commit(next)
    }

    /// Change quantity and cost of a holding from raw form input.
    pub fn edit_asset_from_input(
        &mut self,
        asset_id: Uuid,
        quantity: &str,
        unit_cost: &str,
    ) -> Result<(), CoreError> {
        let quantity = PortfolioService::parse_number("quantity", quantity)?;
        let unit_cost = PortfolioService::parse_number("cost", unit_cost)?;
        self.edit_asset(asset_id, quantity, unit_cost)
    }

    /// Delete a holding after `confirm` approves it.
    ///
    /// Returns the removed asset, or `None` if the id is unknown or the
    /// confirmation was declined (state untouched in both cases).
    pub fn delete_asset<F>(&mut self, asset_id: Uuid, confirm: F) -> Result<Option<Asset>, CoreError>
    where
        F: FnOnce(&Asset) -> bool,
    {
        let mut next = self.portfolio.clone();
        let removed = self
            .portfolio_service
            .delete_asset(&mut next, asset_id, confirm);
        if removed.is_some() {
            self.commit(next)?;
        }
        Ok(removed)
    }

    /// Fetch fresh exchange rates, then fresh prices for every holding.
    ///
    /// Failures are per item: a rate or price that cannot be fetched keeps its
    /// previous value and is listed in the report. Only when every request
    /// fails is the refresh reported as an error, with nothing changed.
    /// A second refresh while one is running is rejected.
    pub async fn refresh(&mut self) -> Result<RefreshReport, CoreError> {
        let _guard = self
            .refresh_flag
            .try_begin()
            .ok_or(CoreError::RefreshInProgress)?;

        let settings = &self.portfolio.settings;
        let home = settings.home_currency.clone();
        let reference = settings.reference_currency.clone();
        let currencies = PriceService::currencies_to_fetch(
            &settings.tracked_currencies,
            &self.portfolio.assets,
            &home,
        );

        let rate_fetch = self.price_service.fetch_rates(&currencies, &home).await;
        let mut rates = self.portfolio.rates.clone();
        rates.merge(&rate_fetch.rates);

        let price_fetch = self
            .price_service
            .fetch_prices(&self.portfolio.assets, &rates, &reference)
            .await;

        let requested = rate_fetch.requested + price_fetch.requested;
        let failed = rate_fetch.failures.len() + price_fetch.failures.len();
        if requested > 0 && failed == requested {
            let first = rate_fetch
                .failures
                .iter()
                .chain(&price_fetch.failures)
                .next()
                .map(|f| format!("{}: {}", f.symbol, f.message))
                .unwrap_or_default();
            log::warn!("Refresh failed: all {requested} quote requests failed");
            return Err(CoreError::RefreshFailed(format!(
                "all {requested} quote requests failed (first: {first})"
            )));
        }

        let mut next = self.portfolio.clone();
        next.rates = rates;
        let mut prices_updated = 0;
        for (id, price) in &price_fetch.prices {
            if self.portfolio_service.set_price(&mut next, *id, *price) {
                prices_updated += 1;
            }
        }
        self.commit(next)?;

        let refreshed_at = Utc::now();
        self.last_refreshed = Some(refreshed_at);

        let mut failures = rate_fetch.failures;
        failures.extend(price_fetch.failures);
        log::info!(
            "Refreshed {} rate(s) and {prices_updated} price(s), {} failure(s)",
            rate_fetch.rates.len(),
            failures.len()
        );

        Ok(RefreshReport {
            refreshed_at,
            rates_updated: rate_fetch.rates.len(),
            prices_updated,
            failures,
        })
    }

    // ── Refresh State ───────────────────────────────────────────────

    /// Whether a refresh is currently running.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresh_flag.is_active()
    }

    /// A handle on the refresh flag that can be polled from elsewhere.
    #[must_use]
    pub fn refresh_flag(&self) -> RefreshFlag {
        self.refresh_flag.clone()
    }

    /// When the last successful refresh finished.
    #[must_use]
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// All holdings, in insertion order.
    #[must_use]
    pub fn get_assets(&self) -> &[Asset] {
        &self.portfolio.assets
    }

    #[must_use]
    pub fn get_asset(&self, asset_id: Uuid) -> Option<&Asset> {
        self.portfolio.assets.iter().find(|a| a.id == asset_id)
    }

    /// Holdings of one category, in insertion order.
    #[must_use]
    pub fn get_assets_by_category(&self, category: AssetCategory) -> Vec<&Asset> {
        self.portfolio
            .assets
            .iter()
            .filter(|a| a.category == category)
            .collect()
    }

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.portfolio.assets.len()
    }

    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.portfolio.rates
    }

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.portfolio.settings
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Table rows for every holding.
    #[must_use]
    pub fn valuations(&self) -> Vec<AssetValuation> {
        self.valuation_service
            .valuate_all(&self.portfolio.assets, &self.portfolio.rates)
    }

    /// Table row for one holding.
    #[must_use]
    pub fn valuation(&self, asset_id: Uuid) -> Option<AssetValuation> {
        self.get_asset(asset_id)
            .map(|a| self.valuation_service.valuate(a, &self.portfolio.rates))
    }

    /// Net worth and profit in the home currency.
    #[must_use]
    pub fn totals(&self) -> PortfolioTotals {
        self.valuation_service
            .aggregate(&self.portfolio.assets, &self.portfolio.rates)
    }

    /// Headline numbers, including the reference-currency net worth.
    #[must_use]
    pub fn dashboard_stats(&self) -> DashboardStats {
        self.valuation_service
            .dashboard_stats(&self.portfolio.assets, &self.portfolio.rates)
    }

    /// Positive and negative allocation charts.
    #[must_use]
    pub fn chart_data(&self, filter: ChartFilter) -> ChartData {
        self.chart_service
            .group_for_chart(&self.portfolio.assets, &self.portfolio.rates, filter)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all holdings as a JSON string.
    pub fn export_assets_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.portfolio.assets)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize assets to JSON: {e}")))
    }

    /// Export all holdings as a CSV string.
    /// Columns: id, category, symbol, quantity, unit_cost, current_price
    #[must_use]
    pub fn export_assets_to_csv(&self) -> String {
        let mut csv = String::from("id,category,symbol,quantity,unit_cost,current_price\n");
        for asset in &self.portfolio.assets {
            let symbol = if asset.symbol.contains(',') || asset.symbol.contains('"') {
                format!("\"{}\"", asset.symbol.replace('"', "\"\""))
            } else {
                asset.symbol.clone()
            };
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                asset.id,
                asset.category,
                symbol,
                asset.quantity,
                asset.unit_cost,
                asset.current_price,
            ));
        }
        csv
    }

    /// Import holdings from a JSON string produced by `export_assets_to_json`.
    ///
    /// All-or-nothing: if any record is invalid or its id already exists,
    /// nothing is imported. Returns the number of holdings added.
    pub fn import_assets_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let imported: Vec<Asset> = serde_json::from_str(json)?;

        let mut seen: std::collections::HashSet<Uuid> =
            self.portfolio.assets.iter().map(|a| a.id).collect();
        let mut accepted = Vec::with_capacity(imported.len());
        for asset in imported {
            let asset = asset.validate()?;
            if !seen.insert(asset.id) {
                return Err(CoreError::ValidationError(format!(
                    "Imported asset {} duplicates an existing id",
                    asset.id
                )));
            }
            accepted.push(asset);
        }

        let count = accepted.len();
        let mut next = self.portfolio.clone();
        next.assets.extend(accepted);
        self.commit(next)?;
        Ok(count)
    }

    /// Full state snapshot as JSON (for debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.portfolio)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
    }

    // ── Provider Availability ───────────────────────────────────────

    /// Names of the quote providers, in fallback order.
    #[must_use]
    pub fn get_provider_names(&self) -> Vec<String> {
        self.price_service.get_provider_names()
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Store `next` and make it the current state. On a failed write the
    /// current state is left as it was.
    fn commit(&mut self, next: Portfolio) -> Result<(), CoreError> {
        StorageManager::save_assets(self.store.as_mut(), &next.assets)?;
        self.portfolio = next;
        Ok(())
    }

    fn build(portfolio: Portfolio, store: Box<dyn KeyValueStore>, price_service: PriceService) -> Self {
        let valuation_service = ValuationService::new(&portfolio.settings);
        let chart_service = ChartService::new(
            valuation_service.clone(),
            portfolio.settings.chart_noise_threshold,
        );

        Self {
            portfolio,
            store,
            portfolio_service: PortfolioService::new(),
            price_service,
            valuation_service,
            chart_service,
            refresh_flag: RefreshFlag::new(),
            last_refreshed: None,
        }
    }
}
