use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rates shipped with the app, used until the first successful refresh.
/// Quoted in units of [`INITIAL_RATES_BASE`] per one unit of the currency.
pub const INITIAL_RATES: [(&str, f64); 4] = [
    ("TWD", 1.0),
    ("USD", 32.5),
    ("JPY", 0.21),
    ("CHF", 38.0),
];

/// Currency the shipped rates are quoted in.
pub const INITIAL_RATES_BASE: &str = "TWD";

/// Exchange rates into the home currency: code → home-currency units per one unit.
///
/// Lookups are fail-soft. A missing, zero or non-finite entry reads as `1.0`, so a
/// currency that has never been fetched under- or over-states its holdings instead
/// of breaking valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    home_currency: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// An empty table holding only `home → 1`.
    pub fn new(home_currency: &str) -> Self {
        let home = home_currency.trim().to_uppercase();
        let mut rates = HashMap::new();
        rates.insert(home.clone(), 1.0);
        Self {
            home_currency: home,
            rates,
        }
    }

    /// The shipped defaults, rebased onto the given home currency.
    ///
    /// A home currency missing from [`INITIAL_RATES`] cannot be rebased; the
    /// table then holds only `home → 1` until the first refresh.
    pub fn with_initial_rates(home_currency: &str) -> Self {
        let mut table = Self::new(home_currency);
        let home_in_base = INITIAL_RATES
            .iter()
            .find(|(code, _)| *code == table.home_currency)
            .map(|(_, rate)| *rate);

        let Some(home_in_base) = home_in_base else {
            log::debug!(
                "No shipped rate for {}, starting with an empty rate table",
                table.home_currency
            );
            return table;
        };
        for (code, rate) in INITIAL_RATES {
            table.set(code, rate / home_in_base);
        }
        table
    }

    pub fn home_currency(&self) -> &str {
        &self.home_currency
    }

    /// Fail-soft lookup.
    pub fn rate(&self, currency: &str) -> f64 {
        self.get(currency).unwrap_or(1.0)
    }

    /// Strict lookup: `None` when the entry is missing or unusable.
    pub fn get(&self, currency: &str) -> Option<f64> {
        self.rates
            .get(&currency.to_uppercase())
            .copied()
            .filter(|r| r.is_finite() && *r != 0.0)
    }

    /// Insert or replace a single rate. The home currency stays pinned at `1.0`.
    pub fn set(&mut self, currency: &str, rate: f64) {
        let code = currency.trim().to_uppercase();
        if code == self.home_currency {
            return;
        }
        self.rates.insert(code, rate);
    }

    /// Drop a currency's rate. The home currency cannot be removed.
    pub fn remove(&mut self, currency: &str) -> Option<f64> {
        let code = currency.to_uppercase();
        if code == self.home_currency {
            return None;
        }
        self.rates.remove(&code)
    }

    /// Overlay freshly fetched rates on top of the current ones.
    pub fn merge(&mut self, fetched: &HashMap<String, f64>) {
        for (code, rate) in fetched {
            self.set(code, *rate);
        }
    }

    /// Currency codes present, sorted.
    pub fn currencies(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
