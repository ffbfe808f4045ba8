use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_HOME_CURRENCY: &str = "TWD";
pub const DEFAULT_REFERENCE_CURRENCY: &str = "USD";
pub const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/get";

/// Tracker configuration.
///
/// Every field has a default, so a partial JSON document (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency all totals are expressed in (e.g., "TWD").
    pub home_currency: String,

    /// Currency of the secondary net-worth readout, and the pricing currency of
    /// foreign equities and crypto (e.g., "USD").
    pub reference_currency: String,

    /// Divisor used for the reference readout when the reference rate is unknown.
    pub reference_fallback_divisor: f64,

    /// Positive chart items at or below this home-currency value are hidden.
    pub chart_noise_threshold: f64,

    /// Currencies whose rate is fetched on every refresh. Currencies of held
    /// cash are added on top of these.
    pub tracked_currencies: Vec<String>,

    /// Optional pass-through proxy. When set, quote requests go to
    /// `{proxy_url}?url=<encoded target>`.
    pub proxy_url: Option<String>,

    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            home_currency: DEFAULT_HOME_CURRENCY.to_string(),
            reference_currency: DEFAULT_REFERENCE_CURRENCY.to_string(),
            reference_fallback_divisor: 32.0,
            chart_noise_threshold: 100.0,
            tracked_currencies: vec!["USD".into(), "JPY".into(), "CHF".into()],
            proxy_url: Some(DEFAULT_PROXY_URL.to_string()),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, filling missing fields with defaults,
    /// then validate them.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()
    }

    /// Normalize currency codes and reject values that would break valuation.
    pub fn validate(mut self) -> Result<Self, CoreError> {
        self.home_currency = validate_currency_code(&self.home_currency)?;
        self.reference_currency = validate_currency_code(&self.reference_currency)?;
        self.tracked_currencies = self
            .tracked_currencies
            .iter()
            .map(|c| validate_currency_code(c))
            .collect::<Result<_, _>>()?;

        if !self.reference_fallback_divisor.is_finite() || self.reference_fallback_divisor <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "reference_fallback_divisor must be a positive number, got {}",
                self.reference_fallback_divisor
            )));
        }
        if !self.chart_noise_threshold.is_finite() || self.chart_noise_threshold < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "chart_noise_threshold must be a non-negative number, got {}",
                self.chart_noise_threshold
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(self)
    }
}

/// Currency codes must be exactly 3 ASCII letters; returned uppercased.
pub fn validate_currency_code(code: &str) -> Result<String, CoreError> {
    let trimmed = code.trim().to_uppercase();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::ValidationError(format!(
            "Invalid currency code '{code}': must be exactly 3 ASCII letters (e.g., TWD, USD, JPY)"
        )));
    }
    Ok(trimmed)
}
