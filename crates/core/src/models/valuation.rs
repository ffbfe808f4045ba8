use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::AssetCategory;

/// Net worth and profit of a set of holdings, in the home currency.
///
/// Totals add component-wise: valuing two disjoint lists separately and adding
/// the results equals valuing their union.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// Signed sum of market values (liabilities subtract)
    pub net_worth: f64,

    /// Signed sum of (market value - cost value)
    pub profit: f64,
}

impl std::ops::Add for PortfolioTotals {
    type Output = PortfolioTotals;

    fn add(self, rhs: Self) -> Self::Output {
        PortfolioTotals {
            net_worth: self.net_worth + rhs.net_worth,
            profit: self.profit + rhs.profit,
        }
    }
}

impl std::iter::Sum for PortfolioTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(PortfolioTotals::default(), |acc, t| acc + t)
    }
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub home_currency: String,
    pub reference_currency: String,

    /// Net worth in the home currency
    pub net_worth: f64,

    /// Net worth divided by the reference currency's rate
    pub net_worth_reference: f64,

    /// Total profit in the home currency
    pub profit: f64,
}

/// One row of the holdings table: the asset plus everything derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetValuation {
    pub asset_id: Uuid,
    pub symbol: String,
    pub category: AssetCategory,
    pub category_label: String,
    pub quantity: f64,

    /// Currency the holding is priced in
    pub currency: String,

    /// `current_price`, or `unit_cost` while no price is known
    pub effective_price: f64,

    /// Market value in the home currency
    pub market_value: f64,

    /// Per-unit price change versus cost, in percent
    pub profit_pct: f64,
}

impl AssetValuation {
    /// Profit percentages of zero count as non-negative.
    pub fn is_profitable(&self) -> bool {
        self.profit_pct >= 0.0
    }
}
