use serde::{Deserialize, Serialize};

use super::asset::AssetCategory;

/// A single pie-chart slice.
///
/// The core computes the numbers: the frontend only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBucket {
    /// Asset symbol for detail slices, category label for grouped slices
    pub name: String,

    /// Absolute market value in the home currency
    pub value: f64,

    /// Category this slice belongs to
    pub category: AssetCategory,

    /// Display color
    pub color: String,
}

/// How the positive-assets chart is projected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "category")]
pub enum ChartFilter {
    /// One slice per category, values summed
    #[default]
    All,
    /// One slice per asset, restricted to a single category
    Category(AssetCategory),
}

/// Both charts of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Assets with a positive market value, projected by the requested filter
    pub positive: Vec<ChartBucket>,

    /// Liabilities and worthless holdings, one slice per asset
    pub negative: Vec<ChartBucket>,
}

impl ChartData {
    pub fn positive_total(&self) -> f64 {
        self.positive.iter().map(|b| b.value).sum()
    }

    pub fn negative_total(&self) -> f64 {
        self.negative.iter().map(|b| b.value).sum()
    }
}
