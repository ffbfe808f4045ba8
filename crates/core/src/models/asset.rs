use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// The category of a tracked holding.
/// Determines which currency the holding is priced in and how it is grouped on charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// Equities listed on the home exchange (2330, 0050, ...), priced in the home currency
    DomesticEquity,
    /// Equities listed abroad (QQQ, VWRA.L, ...), priced in the reference currency
    ForeignEquity,
    /// Cryptocurrencies (BTC, ETH, ...), priced in the reference currency
    Crypto,
    /// Cash balances and liabilities; the symbol names the currency itself
    CashOrLiability,
}

impl AssetCategory {
    /// Every category, in display order.
    pub const ALL: [AssetCategory; 4] = [
        AssetCategory::DomesticEquity,
        AssetCategory::ForeignEquity,
        AssetCategory::Crypto,
        AssetCategory::CashOrLiability,
    ];

    /// Human-readable label used for table rows and chart grouping.
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::DomesticEquity => "Domestic Stocks",
            AssetCategory::ForeignEquity => "Foreign Stocks",
            AssetCategory::Crypto => "Crypto",
            AssetCategory::CashOrLiability => "Cash / Liabilities",
        }
    }

    /// Chart color assigned to this category.
    pub fn color(&self) -> &'static str {
        match self {
            AssetCategory::DomesticEquity => "#FF6384",
            AssetCategory::ForeignEquity => "#36A2EB",
            AssetCategory::Crypto => "#FFCE56",
            AssetCategory::CashOrLiability => "#4BC0C0",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetCategory::DomesticEquity => write!(f, "domestic_equity"),
            AssetCategory::ForeignEquity => write!(f, "foreign_equity"),
            AssetCategory::Crypto => write!(f, "crypto"),
            AssetCategory::CashOrLiability => write!(f, "cash_or_liability"),
        }
    }
}

impl std::str::FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "domestic_equity" => Ok(AssetCategory::DomesticEquity),
            "foreign_equity" => Ok(AssetCategory::ForeignEquity),
            "crypto" => Ok(AssetCategory::Crypto),
            "cash_or_liability" => Ok(AssetCategory::CashOrLiability),
            other => Err(format!("unknown asset category '{other}'")),
        }
    }
}

/// A single holding: what it is, how much of it, what it cost, what it is worth now.
///
/// `category` and `symbol` are fixed at creation. `quantity` and `unit_cost` change
/// only through an edit; `current_price` only through a refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Stable identifier, assigned at creation
    pub id: Uuid,

    /// Holding category; decides the pricing currency
    pub category: AssetCategory,

    /// Ticker, or the currency code for cash (uppercased, trimmed)
    pub symbol: String,

    /// Signed amount held; negative for liabilities or shorts
    pub quantity: f64,

    /// Cost basis per unit, in the holding's own currency
    pub unit_cost: f64,

    /// Last known market price per unit in the holding's own currency.
    /// `0.0` until the first successful refresh. For cash this is the
    /// currency's rate in the home currency.
    #[serde(default)]
    pub current_price: f64,
}

impl Asset {
    /// Create a fresh asset with a new id and no known price.
    pub fn new(
        category: AssetCategory,
        symbol: impl Into<String>,
        quantity: f64,
        unit_cost: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            symbol: normalize_symbol(&symbol.into()),
            quantity,
            unit_cost,
            current_price: 0.0,
        }
    }

    /// Whether a refresh has ever populated the price.
    pub fn has_price(&self) -> bool {
        self.current_price != 0.0
    }

    /// Quantity, cost and price are all finite.
    pub fn is_well_formed(&self) -> bool {
        self.quantity.is_finite() && self.unit_cost.is_finite() && self.current_price.is_finite()
    }

    /// Normalize the symbol and check a record that did not come from [`Asset::new`]
    /// (stored or imported data).
    pub fn validate(mut self) -> Result<Self, CoreError> {
        self.symbol = normalize_symbol(&self.symbol);
        if self.symbol.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "Asset {} has an empty symbol",
                self.id
            )));
        }
        if !self.is_well_formed() {
            return Err(CoreError::ValidationError(format!(
                "Asset {} ({}) has a non-finite number",
                self.id, self.symbol
            )));
        }
        Ok(self)
    }
}

/// Uppercase and trim a user-entered symbol.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}
