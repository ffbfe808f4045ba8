use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::asset::{normalize_symbol, Asset, AssetCategory};
use crate::models::portfolio::Portfolio;

/// Add / edit / delete commands on the holdings list.
///
/// Pure business logic: no I/O, no API calls. Input is validated before any
/// mutation, so a rejected command leaves the portfolio exactly as it was.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Append a new holding with a fresh id and no known price.
    pub fn add_asset(
        &self,
        portfolio: &mut Portfolio,
        category: AssetCategory,
        symbol: &str,
        quantity: f64,
        unit_cost: f64,
    ) -> Result<Uuid, CoreError> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(CoreError::ValidationError("Symbol must not be empty".into()));
        }
        Self::validate_number("quantity", quantity)?;
        Self::validate_number("cost", unit_cost)?;

        let asset = Asset::new(category, symbol, quantity, unit_cost);
        let id = asset.id;
        portfolio.assets.push(asset);
        Ok(id)
    }

    /// Change quantity and cost of an existing holding. Category, symbol and
    /// price are left alone.
    pub fn edit_asset(
        &self,
        portfolio: &mut Portfolio,
        asset_id: Uuid,
        quantity: f64,
        unit_cost: f64,
    ) -> Result<(), CoreError> {
        Self::validate_number("quantity", quantity)?;
        Self::validate_number("cost", unit_cost)?;

        let asset = portfolio
            .assets
            .iter_mut()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| CoreError::AssetNotFound(asset_id.to_string()))?;
        asset.quantity = quantity;
        asset.unit_cost = unit_cost;
        Ok(())
    }

    /// Remove a holding once `confirm` agrees.
    ///
    /// Returns the removed asset. An unknown id, or a declined confirmation,
    /// is a no-op returning `None`.
    pub fn delete_asset<F>(
        &self,
        portfolio: &mut Portfolio,
        asset_id: Uuid,
        confirm: F,
    ) -> Option<Asset>
    where
        F: FnOnce(&Asset) -> bool,
    {
        let idx = portfolio.assets.iter().position(|a| a.id == asset_id)?;
        if !confirm(&portfolio.assets[idx]) {
            return None;
        }
        Some(portfolio.assets.remove(idx))
    }

    /// Store a refreshed price. Unknown ids are ignored.
    pub fn set_price(&self, portfolio: &mut Portfolio, asset_id: Uuid, price: f64) -> bool {
        match portfolio.assets.iter_mut().find(|a| a.id == asset_id) {
            Some(asset) => {
                asset.current_price = price;
                true
            }
            None => false,
        }
    }

    /// Parse a user-entered number. Empty, non-numeric and non-finite input is rejected.
    pub fn parse_number(field: &str, raw: &str) -> Result<f64, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::ValidationError(format!("{field} is required")));
        }
        let value: f64 = trimmed.parse().map_err(|_| {
            CoreError::ValidationError(format!("{field} must be a number, got '{trimmed}'"))
        })?;
        Self::validate_number(field, value)?;
        Ok(value)
    }

    fn validate_number(field: &str, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "{field} must be a finite number, got {value}"
            )));
        }
        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
