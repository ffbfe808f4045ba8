// ═══════════════════════════════════════════════════════════════════
// Model Tests: AssetCategory, Asset, RateTable, Settings, Totals,
// ChartFilter, RefreshFlag
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use asset_tracker_core::models::asset::{normalize_symbol, Asset, AssetCategory};
use asset_tracker_core::models::chart::{ChartBucket, ChartData, ChartFilter};
use asset_tracker_core::models::rates::{RateTable, INITIAL_RATES, INITIAL_RATES_BASE};
use asset_tracker_core::models::refresh::RefreshFlag;
use asset_tracker_core::models::settings::{validate_currency_code, Settings};
use asset_tracker_core::models::valuation::PortfolioTotals;

// ── AssetCategory ───────────────────────────────────────────────────

mod asset_category {
    use super::*;

    #[test]
    fn display_matches_serde_name() {
        for category in AssetCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{category}\""));
        }
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AssetCategory::CashOrLiability).unwrap(),
            "\"cash_or_liability\""
        );
        assert_eq!(
            serde_json::to_string(&AssetCategory::DomesticEquity).unwrap(),
            "\"domestic_equity\""
        );
    }

    #[test]
    fn from_str_accepts_display_names() {
        for category in AssetCategory::ALL {
            let parsed: AssetCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn from_str_is_case_insensitive_and_trims() {
        let parsed: AssetCategory = "  Crypto ".parse().unwrap();
        assert_eq!(parsed, AssetCategory::Crypto);
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!("bonds".parse::<AssetCategory>().is_err());
    }

    #[test]
    fn labels_are_distinct() {
        let labels: std::collections::HashSet<&str> =
            AssetCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn colors_are_hex() {
        for category in AssetCategory::ALL {
            let color = category.color();
            assert!(color.starts_with('#'));
            assert_eq!(color.len(), 7);
        }
    }
}

// ── Asset ───────────────────────────────────────────────────────────

mod asset {
    use super::*;

    #[test]
    fn new_uppercases_and_trims_symbol() {
        let a = Asset::new(AssetCategory::ForeignEquity, "  vwra.l ", 1.0, 1.0);
        assert_eq!(a.symbol, "VWRA.L");
    }

    #[test]
    fn new_starts_without_price() {
        let a = Asset::new(AssetCategory::Crypto, "btc", 0.5, 60000.0);
        assert_eq!(a.current_price, 0.0);
        assert!(!a.has_price());
    }

    #[test]
    fn validate_normalizes_symbol() {
        let mut a = Asset::new(AssetCategory::CashOrLiability, "USD", 1.0, 1.0);
        a.symbol = " usd ".into();
        assert_eq!(a.validate().unwrap().symbol, "USD");
    }

    #[test]
    fn validate_rejects_empty_symbol_and_nan() {
        let mut blank = Asset::new(AssetCategory::Crypto, "BTC", 1.0, 1.0);
        blank.symbol = "  ".into();
        assert!(blank.validate().is_err());

        let mut nan = Asset::new(AssetCategory::Crypto, "BTC", 1.0, 1.0);
        nan.current_price = f64::NAN;
        assert!(nan.validate().is_err());
    }

    #[test]
    fn new_assigns_unique_ids() {
        let a = Asset::new(AssetCategory::Crypto, "BTC", 1.0, 1.0);
        let b = Asset::new(AssetCategory::Crypto, "BTC", 1.0, 1.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn negative_quantity_allowed() {
        let a = Asset::new(AssetCategory::CashOrLiability, "usd", -1000.0, 1.0);
        assert_eq!(a.quantity, -1000.0);
        assert!(a.is_well_formed());
    }

    #[test]
    fn non_finite_is_not_well_formed() {
        let mut a = Asset::new(AssetCategory::DomesticEquity, "2330", 1.0, 1.0);
        a.quantity = f64::NAN;
        assert!(!a.is_well_formed());

        let mut b = Asset::new(AssetCategory::DomesticEquity, "2330", 1.0, 1.0);
        b.unit_cost = f64::INFINITY;
        assert!(!b.is_well_formed());
    }

    #[test]
    fn serde_roundtrip_json() {
        let mut a = Asset::new(AssetCategory::ForeignEquity, "QQQ", 10.0, 400.0);
        a.current_price = 450.0;
        let json = serde_json::to_string(&a).unwrap();
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }

    #[test]
    fn missing_current_price_defaults_to_zero() {
        let json = r#"{
            "id": "4f9c1c1e-8f5e-4a59-9d3c-0d0f8c6d2a11",
            "category": "crypto",
            "symbol": "ETH",
            "quantity": 2.0,
            "unit_cost": 3000.0
        }"#;
        let a: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(a.current_price, 0.0);
    }

    #[test]
    fn normalize_symbol_handles_inner_spaces() {
        assert_eq!(normalize_symbol("  brk.b  "), "BRK.B");
        assert_eq!(normalize_symbol(""), "");
    }
}

// ── RateTable ───────────────────────────────────────────────────────

mod rate_table {
    use super::*;

    #[test]
    fn home_currency_is_one() {
        let t = RateTable::new("twd");
        assert_eq!(t.home_currency(), "TWD");
        assert_eq!(t.rate("TWD"), 1.0);
        assert_eq!(t.get("TWD"), Some(1.0));
    }

    #[test]
    fn missing_rate_is_one() {
        let t = RateTable::new("TWD");
        assert_eq!(t.rate("EUR"), 1.0);
        assert_eq!(t.get("EUR"), None);
    }

    #[test]
    fn zero_and_non_finite_rates_read_as_one() {
        let mut t = RateTable::new("TWD");
        t.set("USD", 0.0);
        t.set("JPY", f64::NAN);
        assert_eq!(t.rate("USD"), 1.0);
        assert_eq!(t.rate("JPY"), 1.0);
        assert_eq!(t.get("USD"), None);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut t = RateTable::new("TWD");
        t.set("usd", 32.0);
        assert_eq!(t.rate("Usd"), 32.0);
    }

    #[test]
    fn home_rate_cannot_be_overwritten_or_removed() {
        let mut t = RateTable::new("TWD");
        t.set("TWD", 5.0);
        assert_eq!(t.rate("TWD"), 1.0);
        assert_eq!(t.remove("TWD"), None);
        assert_eq!(t.get("TWD"), Some(1.0));
    }

    #[test]
    fn initial_rates_loaded() {
        let t = RateTable::with_initial_rates("TWD");
        for (code, rate) in INITIAL_RATES {
            assert_eq!(t.rate(code), rate);
        }
        assert_eq!(t.currencies(), vec!["CHF", "JPY", "TWD", "USD"]);
        assert_eq!(INITIAL_RATES_BASE, "TWD");
    }

    #[test]
    fn initial_rates_rebased_onto_other_home() {
        let t = RateTable::with_initial_rates("JPY");
        assert_eq!(t.home_currency(), "JPY");
        assert_eq!(t.rate("JPY"), 1.0);
        assert!((t.rate("USD") - 32.5 / 0.21).abs() < 1e-9);
        assert!((t.rate("TWD") - 1.0 / 0.21).abs() < 1e-9);
        assert!((t.rate("CHF") - 38.0 / 0.21).abs() < 1e-9);
        assert_eq!(t.currencies(), vec!["CHF", "JPY", "TWD", "USD"]);
    }

    #[test]
    fn initial_rates_empty_for_unknown_home() {
        let t = RateTable::with_initial_rates("eur");
        assert_eq!(t.currencies(), vec!["EUR"]);
        assert_eq!(t.get("USD"), None);
        assert_eq!(t.rate("USD"), 1.0);
    }

    #[test]
    fn merge_overlays_and_keeps_others() {
        let mut t = RateTable::with_initial_rates("TWD");
        let mut fetched = HashMap::new();
        fetched.insert("USD".to_string(), 31.2);
        fetched.insert("EUR".to_string(), 34.0);
        t.merge(&fetched);

        assert_eq!(t.rate("USD"), 31.2);
        assert_eq!(t.rate("EUR"), 34.0);
        assert_eq!(t.rate("JPY"), 0.21);
        assert_eq!(t.rate("TWD"), 1.0);
    }

    #[test]
    fn remove_returns_previous() {
        let mut t = RateTable::with_initial_rates("TWD");
        assert_eq!(t.remove("USD"), Some(32.5));
        assert_eq!(t.rate("USD"), 1.0);
    }
}

// ── Settings ────────────────────────────────────────────────────────

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.home_currency, "TWD");
        assert_eq!(s.reference_currency, "USD");
        assert_eq!(s.reference_fallback_divisor, 32.0);
        assert_eq!(s.chart_noise_threshold, 100.0);
        assert_eq!(s.tracked_currencies, vec!["USD", "JPY", "CHF"]);
        assert!(s.proxy_url.is_some());
        assert_eq!(s.request_timeout_secs, 30);
    }

    #[test]
    fn empty_json_gives_defaults() {
        let s = Settings::from_json("{}").unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_json_overrides_and_normalizes() {
        let s = Settings::from_json(
            r#"{"home_currency": "eur", "tracked_currencies": ["usd", "gbp"], "proxy_url": null}"#,
        )
        .unwrap();
        assert_eq!(s.home_currency, "EUR");
        assert_eq!(s.tracked_currencies, vec!["USD", "GBP"]);
        assert_eq!(s.proxy_url, None);
        assert_eq!(s.reference_currency, "USD");
    }

    #[test]
    fn rejects_bad_currency_code() {
        assert!(Settings::from_json(r#"{"home_currency": "TAIWAN"}"#).is_err());
        assert!(Settings::from_json(r#"{"tracked_currencies": ["U$D"]}"#).is_err());
    }

    #[test]
    fn rejects_non_positive_divisor() {
        assert!(Settings::from_json(r#"{"reference_fallback_divisor": 0}"#).is_err());
        assert!(Settings::from_json(r#"{"reference_fallback_divisor": -3}"#).is_err());
    }

    #[test]
    fn rejects_negative_threshold() {
        assert!(Settings::from_json(r#"{"chart_noise_threshold": -1}"#).is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Settings::from_json(r#"{"request_timeout_secs": 0}"#).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
        assert!(Settings::from_json(r#"{"request_timeout_secs": 1}"#).is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn validate_currency_code_uppercases() {
        assert_eq!(validate_currency_code(" jpy ").unwrap(), "JPY");
        assert!(validate_currency_code("JP").is_err());
        assert!(validate_currency_code("").is_err());
    }
}

// ── PortfolioTotals ─────────────────────────────────────────────────

mod totals {
    use super::*;

    #[test]
    fn add_is_component_wise() {
        let a = PortfolioTotals { net_worth: 100.0, profit: 10.0 };
        let b = PortfolioTotals { net_worth: -40.0, profit: 5.0 };
        let sum = a + b;
        assert_eq!(sum.net_worth, 60.0);
        assert_eq!(sum.profit, 15.0);
    }

    #[test]
    fn sum_of_empty_is_zero() {
        let total: PortfolioTotals = Vec::<PortfolioTotals>::new().into_iter().sum();
        assert_eq!(total, PortfolioTotals::default());
    }
}

// ── Charts ──────────────────────────────────────────────────────────

mod chart {
    use super::*;

    #[test]
    fn filter_defaults_to_all() {
        assert_eq!(ChartFilter::default(), ChartFilter::All);
    }

    #[test]
    fn filter_serde_roundtrip() {
        for filter in [ChartFilter::All, ChartFilter::Category(AssetCategory::Crypto)] {
            let json = serde_json::to_string(&filter).unwrap();
            let back: ChartFilter = serde_json::from_str(&json).unwrap();
            assert_eq!(filter, back);
        }
    }

    #[test]
    fn totals_sum_values() {
        let bucket = |value: f64| ChartBucket {
            name: "X".into(),
            value,
            category: AssetCategory::Crypto,
            color: "#FFCE56".into(),
        };
        let data = ChartData {
            positive: vec![bucket(100.0), bucket(250.0)],
            negative: vec![bucket(40.0)],
        };
        assert_eq!(data.positive_total(), 350.0);
        assert_eq!(data.negative_total(), 40.0);
    }
}

// ── RefreshFlag ─────────────────────────────────────────────────────

mod refresh_flag {
    use super::*;

    #[test]
    fn starts_inactive() {
        assert!(!RefreshFlag::new().is_active());
    }

    #[test]
    fn second_begin_rejected_while_held() {
        let flag = RefreshFlag::new();
        let guard = flag.try_begin();
        assert!(guard.is_some());
        assert!(flag.is_active());
        assert!(flag.try_begin().is_none());
    }

    #[test]
    fn drop_clears_flag() {
        let flag = RefreshFlag::new();
        {
            let _guard = flag.try_begin().unwrap();
            assert!(flag.is_active());
        }
        assert!(!flag.is_active());
        assert!(flag.try_begin().is_some());
    }

    #[test]
    fn clones_share_state() {
        let flag = RefreshFlag::new();
        let observer = flag.clone();
        let _guard = flag.try_begin().unwrap();
        assert!(observer.is_active());
        assert!(observer.try_begin().is_none());
    }
}
