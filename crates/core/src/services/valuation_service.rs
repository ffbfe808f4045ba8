use crate::models::asset::{Asset, AssetCategory};
use crate::models::rates::RateTable;
use crate::models::settings::Settings;
use crate::models::valuation::{AssetValuation, DashboardStats, PortfolioTotals};

/// Turns holdings plus a rate table into home-currency values.
///
/// Pure business logic: no I/O, no state. Every number on the dashboard is
/// re-derived from the current inputs on each call.
#[derive(Debug, Clone)]
pub struct ValuationService {
    home_currency: String,
    reference_currency: String,
    reference_fallback_divisor: f64,
}

impl ValuationService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            home_currency: settings.home_currency.to_uppercase(),
            reference_currency: settings.reference_currency.to_uppercase(),
            reference_fallback_divisor: settings.reference_fallback_divisor,
        }
    }

    pub fn home_currency(&self) -> &str {
        &self.home_currency
    }

    pub fn reference_currency(&self) -> &str {
        &self.reference_currency
    }

    /// The currency an asset's price and cost are quoted in.
    pub fn resolve_currency(&self, asset: &Asset) -> String {
        match asset.category {
            AssetCategory::DomesticEquity => self.home_currency.clone(),
            AssetCategory::ForeignEquity | AssetCategory::Crypto => {
                self.reference_currency.clone()
            }
            AssetCategory::CashOrLiability => asset.symbol.clone(),
        }
    }

    /// Best available per-unit price: the fetched price, or the cost basis
    /// while nothing has been fetched yet.
    pub fn effective_price(asset: &Asset) -> f64 {
        if asset.current_price != 0.0 {
            asset.current_price
        } else {
            asset.unit_cost
        }
    }

    /// Market value in the home currency. Negative quantities give negative values.
    pub fn market_value(&self, asset: &Asset, rates: &RateTable) -> f64 {
        let price = Self::effective_price(asset);
        match asset.category {
            // For cash the price already is the currency's home rate.
            AssetCategory::CashOrLiability => asset.quantity * price,
            AssetCategory::DomesticEquity
            | AssetCategory::ForeignEquity
            | AssetCategory::Crypto => {
                let rate = rates.rate(&self.resolve_currency(asset));
                asset.quantity * price * rate
            }
        }
    }

    /// Cost basis in the home currency. Applied uniformly, cash included.
    pub fn cost_value(&self, asset: &Asset, rates: &RateTable) -> f64 {
        let rate = rates.rate(&self.resolve_currency(asset));
        asset.quantity * asset.unit_cost * rate
    }

    /// Per-unit price change versus cost, in percent. Independent of quantity.
    ///
    /// Zero for home-currency holdings and for holdings without a cost basis.
    pub fn profit_percent(&self, asset: &Asset) -> f64 {
        if self.resolve_currency(asset) == self.home_currency || asset.unit_cost == 0.0 {
            return 0.0;
        }
        (Self::effective_price(asset) - asset.unit_cost) / asset.unit_cost * 100.0
    }

    /// Net worth and profit over all holdings.
    pub fn aggregate(&self, assets: &[Asset], rates: &RateTable) -> PortfolioTotals {
        assets
            .iter()
            .map(|asset| {
                let market = self.market_value(asset, rates);
                PortfolioTotals {
                    net_worth: market,
                    profit: market - self.cost_value(asset, rates),
                }
            })
            .sum()
    }

    /// Express a home-currency amount in the reference currency.
    /// Falls back to the configured divisor when the reference rate is unknown.
    pub fn to_reference(&self, amount: f64, rates: &RateTable) -> f64 {
        let divisor = rates
            .get(&self.reference_currency)
            .unwrap_or(self.reference_fallback_divisor);
        amount / divisor
    }

    /// Headline dashboard numbers.
    pub fn dashboard_stats(&self, assets: &[Asset], rates: &RateTable) -> DashboardStats {
        let totals = self.aggregate(assets, rates);
        DashboardStats {
            home_currency: self.home_currency.clone(),
            reference_currency: self.reference_currency.clone(),
            net_worth: totals.net_worth,
            net_worth_reference: self.to_reference(totals.net_worth, rates),
            profit: totals.profit,
        }
    }

    /// Derived table row for one holding.
    pub fn valuate(&self, asset: &Asset, rates: &RateTable) -> AssetValuation {
        AssetValuation {
            asset_id: asset.id,
            symbol: asset.symbol.clone(),
            category: asset.category,
            category_label: asset.category.label().to_string(),
            quantity: asset.quantity,
            currency: self.resolve_currency(asset),
            effective_price: Self::effective_price(asset),
            market_value: self.market_value(asset, rates),
            profit_pct: self.profit_percent(asset),
        }
    }

    /// Derived table rows, in the order the holdings are stored.
    pub fn valuate_all(&self, assets: &[Asset], rates: &RateTable) -> Vec<AssetValuation> {
        assets.iter().map(|a| self.valuate(a, rates)).collect()
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
