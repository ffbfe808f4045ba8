use crate::errors::CoreError;
use crate::models::asset::Asset;

use super::store::KeyValueStore;

/// Key under which the holdings list is stored.
pub const ASSETS_KEY: &str = "assets";

/// High-level storage operations: read/write the holdings list as JSON.
pub struct StorageManager;

impl StorageManager {
    /// Serialize holdings to the JSON document that gets stored.
    pub fn assets_to_json(assets: &[Asset]) -> Result<String, CoreError> {
        serde_json::to_string(assets)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize assets: {e}")))
    }

    /// Parse a stored JSON document. Symbols are normalized; records with an
    /// empty symbol or a non-finite number are dropped.
    pub fn assets_from_json(json: &str) -> Result<Vec<Asset>, CoreError> {
        let assets: Vec<Asset> = serde_json::from_str(json)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize assets: {e}")))?;
        let valid = assets
            .into_iter()
            .filter_map(|asset| match asset.validate() {
                Ok(asset) => Some(asset),
                Err(e) => {
                    log::warn!("Dropping malformed stored asset: {e}");
                    None
                }
            })
            .collect();
        Ok(valid)
    }

    /// Write the holdings list, replacing whatever was stored.
    pub fn save_assets(store: &mut dyn KeyValueStore, assets: &[Asset]) -> Result<(), CoreError> {
        let json = Self::assets_to_json(assets)?;
        store.set(ASSETS_KEY, &json)
    }

    /// Read the holdings list.
    ///
    /// Never fails: a missing key, an unreadable store or a corrupt document
    /// all yield an empty list (the latter two are logged).
    pub fn load_assets(store: &dyn KeyValueStore) -> Vec<Asset> {
        let json = match store.get(ASSETS_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Failed to read stored assets, starting empty: {e}");
                return Vec::new();
            }
        };

        match Self::assets_from_json(&json) {
            Ok(assets) => assets,
            Err(e) => {
                log::warn!("Stored assets are corrupt, starting empty: {e}");
                Vec::new()
            }
        }
    }
}
