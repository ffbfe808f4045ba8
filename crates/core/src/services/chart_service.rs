use crate::models::asset::{Asset, AssetCategory};
use crate::models::chart::{ChartBucket, ChartData, ChartFilter};
use crate::models::rates::RateTable;
use crate::services::valuation_service::ValuationService;

/// Generates chart-ready slices from holdings.
///
/// Holdings are split into a positive set (market value > 0) and a negative set
/// (market value ≤ 0). Slice values are absolute. Positive holdings worth no more
/// than the noise threshold are left out.
pub struct ChartService {
    valuation: ValuationService,
    noise_threshold: f64,
}

impl ChartService {
    pub fn new(valuation: ValuationService, noise_threshold: f64) -> Self {
        Self {
            valuation,
            noise_threshold,
        }
    }

    /// Build both charts: positive projected by `filter`, negative as detail.
    pub fn group_for_chart(
        &self,
        assets: &[Asset],
        rates: &RateTable,
        filter: ChartFilter,
    ) -> ChartData {
        let (positive, negative) = self.partition(assets, rates);

        let positive = match filter {
            ChartFilter::All => Self::sum_by_category(&positive),
            ChartFilter::Category(category) => positive
                .into_iter()
                .filter(|b| b.category == category)
                .collect(),
        };

        ChartData { positive, negative }
    }

    /// Per-asset slices, split by sign. Noise is dropped from the positive side only.
    pub fn partition(
        &self,
        assets: &[Asset],
        rates: &RateTable,
    ) -> (Vec<ChartBucket>, Vec<ChartBucket>) {
        let mut positive = Vec::new();
        let mut negative = Vec::new();

        for asset in assets {
            let market_value = self.valuation.market_value(asset, rates);
            let bucket = ChartBucket {
                name: asset.symbol.clone(),
                value: market_value.abs(),
                category: asset.category,
                color: asset.category.color().to_string(),
            };

            if market_value > 0.0 {
                if bucket.value > self.noise_threshold {
                    positive.push(bucket);
                }
            } else {
                negative.push(bucket);
            }
        }

        (positive, negative)
    }

    /// One slice per category, in order of first appearance.
    fn sum_by_category(items: &[ChartBucket]) -> Vec<ChartBucket> {
        let mut grouped: Vec<(AssetCategory, f64)> = Vec::new();
        for item in items {
            match grouped.iter_mut().find(|(c, _)| *c == item.category) {
                Some((_, total)) => *total += item.value,
                None => grouped.push((item.category, item.value)),
            }
        }

        grouped
            .into_iter()
            .map(|(category, value)| ChartBucket {
                name: category.label().to_string(),
                value,
                category,
                color: category.color().to_string(),
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new(ValuationService::default(), 100.0)
    }
}
