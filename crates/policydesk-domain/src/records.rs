//! CRM records served through the resolver

use serde::{Deserialize, Serialize};

/// An ingestion source, typically a batch of uploaded policy PDFs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    /// Source identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Source kind (e.g., "pdf_upload", "manual")
    pub kind: String,

    /// Number of records ingested from this source
    pub record_count: u64,

    /// When the source was last synced, as an ISO-8601 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<String>,
}

/// An insurance policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Policy identifier
    pub id: String,

    /// Insurer-issued policy number
    pub policy_number: String,

    /// Policy holder
    pub customer_name: String,

    /// Issuing insurer
    pub insurer: String,

    /// Annual premium, decimal string
    pub premium: String,

    /// Lifecycle status (e.g., "active", "lapsed", "renewal_due")
    pub status: String,
}

/// Headline figures for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Total policies on record
    pub total_policies: u64,

    /// Policies currently in force
    pub active_policies: u64,

    /// Sum of annual premiums, decimal string
    pub total_premium: String,

    /// Policies due for renewal in the next 30 days
    pub renewals_due: u64,
}
