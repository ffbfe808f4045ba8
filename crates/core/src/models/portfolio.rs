use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::rates::RateTable;
use super::settings::Settings;

/// The application state: holdings, the current rate table and the settings
/// they are valued under.
///
/// Only `assets` is persisted; rates start from the shipped defaults and are
/// refreshed from the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    /// All holdings, in insertion order
    pub assets: Vec<Asset>,

    /// Exchange rates into the home currency
    pub rates: RateTable,

    /// Valuation and fetch configuration
    pub settings: Settings,
}

impl Portfolio {
    pub fn new(settings: Settings) -> Self {
        Self {
            assets: Vec::new(),
            rates: RateTable::with_initial_rates(&settings.home_currency),
            settings,
        }
    }

    pub fn with_assets(settings: Settings, assets: Vec<Asset>) -> Self {
        Self {
            assets,
            ..Self::new(settings)
        }
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
