//! Cache bindings and deterministic demo data for the resolver's last tier.

use policydesk_domain::{CacheKey, DashboardSummary, DataSource, Policy, SettingsRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A data kind the resolver can cache and, as a last resort, fake
pub trait CachedResource: Serialize + DeserializeOwned {
    /// Cache slot holding the last backend value
    const CACHE_KEY: CacheKey;

    /// Fixed demo value, identical on every call
    fn demo() -> Self;
}

impl CachedResource for SettingsRecord {
    const CACHE_KEY: CacheKey = CacheKey::Settings;

    fn demo() -> Self {
        SettingsRecord::default()
    }
}

impl CachedResource for Vec<DataSource> {
    const CACHE_KEY: CacheKey = CacheKey::Uploads;

    fn demo() -> Self {
        vec![
            DataSource {
                id: "demo-upload-1".to_string(),
                name: "Motor renewals (demo)".to_string(),
                kind: "pdf_upload".to_string(),
                record_count: 2,
                last_synced: Some("2024-01-15T09:30:00Z".to_string()),
            },
            DataSource {
                id: "demo-manual".to_string(),
                name: "Manual entries (demo)".to_string(),
                kind: "manual".to_string(),
                record_count: 1,
                last_synced: None,
            },
        ]
    }
}

impl CachedResource for Vec<Policy> {
    const CACHE_KEY: CacheKey = CacheKey::Policies;

    fn demo() -> Self {
        vec![
            demo_policy("demo-1", "MOT-0001", "Asha Verma", "Acme General", "12500", "active"),
            demo_policy("demo-2", "HLT-0002", "Rohan Das", "Northwind Health", "18400", "active"),
            demo_policy("demo-3", "MOT-0003", "Meera Iyer", "Acme General", "9100", "renewal_due"),
        ]
    }
}

impl CachedResource for DashboardSummary {
    const CACHE_KEY: CacheKey = CacheKey::Dashboard;

    /// Figures consistent with the demo policy list
    fn demo() -> Self {
        DashboardSummary {
            total_policies: 3,
            active_policies: 2,
            total_premium: "40000".to_string(),
            renewals_due: 1,
        }
    }
}

fn demo_policy(
    id: &str,
    number: &str,
    customer: &str,
    insurer: &str,
    premium: &str,
    status: &str,
) -> Policy {
    Policy {
        id: id.to_string(),
        policy_number: number.to_string(),
        customer_name: customer.to_string(),
        insurer: insurer.to_string(),
        premium: premium.to_string(),
        status: status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_data_is_deterministic() {
        assert_eq!(<Vec<Policy>>::demo(), <Vec<Policy>>::demo());
        assert_eq!(<Vec<DataSource>>::demo(), <Vec<DataSource>>::demo());
        assert_eq!(SettingsRecord::demo(), SettingsRecord::default());
    }

    #[test]
    fn test_demo_dashboard_matches_demo_policies() {
        let policies = <Vec<Policy>>::demo();
        let dashboard = DashboardSummary::demo();

        let total: u64 = policies
            .iter()
            .map(|p| p.premium.parse::<u64>().unwrap())
            .sum();
        let active = policies.iter().filter(|p| p.status == "active").count() as u64;

        assert_eq!(dashboard.total_policies, policies.len() as u64);
        assert_eq!(dashboard.active_policies, active);
        assert_eq!(dashboard.total_premium, total.to_string());
    }

    #[test]
    fn test_cache_keys_are_distinct_per_kind() {
        let keys = [
            SettingsRecord::CACHE_KEY,
            <Vec<DataSource>>::CACHE_KEY,
            <Vec<Policy>>::CACHE_KEY,
            DashboardSummary::CACHE_KEY,
        ];
        for key in CacheKey::ALL {
            assert_eq!(keys.iter().filter(|k| **k == key).count(), 1);
        }
    }
}
