//! Business settings record

use serde::{Deserialize, Serialize};

/// Business settings used by the dashboard projections
///
/// Every field is a decimal number carried as a string, exactly as the
/// backend stores it. A refresh replaces the whole record; fields are never
/// merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    /// Brokerage commission, percent
    pub brokerage_percent: String,

    /// Daily cost of one sales rep
    pub rep_daily_cost: String,

    /// Expected lead conversion, percent
    pub expected_conversion: String,

    /// Expected premium growth, percent
    pub premium_growth: String,
}

impl Default for SettingsRecord {
    /// Hardcoded defaults used until a fetch succeeds
    ///
    /// - Brokerage: 15%
    /// - Rep daily cost: 2000
    /// - Conversion: 25%
    /// - Premium growth: 10%
    fn default() -> Self {
        Self {
            brokerage_percent: "15".to_string(),
            rep_daily_cost: "2000".to_string(),
            expected_conversion: "25".to_string(),
            premium_growth: "10".to_string(),
        }
    }
}

impl SettingsRecord {
    /// Check that every field parses as a decimal number
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("brokeragePercent", &self.brokerage_percent),
            ("repDailyCost", &self.rep_daily_cost),
            ("expectedConversion", &self.expected_conversion),
            ("premiumGrowth", &self.premium_growth),
        ];

        for (name, value) in fields {
            match value.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => {}
                _ => return Err(format!("{} is not a decimal number: {:?}", name, value)),
            }
        }

        Ok(())
    }
}
