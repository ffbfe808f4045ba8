pub mod asset;
pub mod chart;
pub mod portfolio;
pub mod rates;
pub mod refresh;
pub mod settings;
pub mod valuation;
