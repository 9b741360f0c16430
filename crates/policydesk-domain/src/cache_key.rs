//! Cache keys for locally persisted data

/// A locally cached data kind
///
/// Every call site that ends a session clears all of these:
/// - Policies: the policy list
/// - Uploads: ingested data sources (uploaded PDF batches)
/// - Dashboard: dashboard summary figures
/// - Settings: business settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Cached policy list
    Policies,

    /// Cached data sources
    Uploads,

    /// Cached dashboard summary
    Dashboard,

    /// Cached business settings
    Settings,
}

impl CacheKey {
    /// All known cache keys, in clearing order
    pub const ALL: [CacheKey; 4] = [
        CacheKey::Policies,
        CacheKey::Uploads,
        CacheKey::Dashboard,
        CacheKey::Settings,
    ];

    /// Get the storage name of the key
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Policies => "policies",
            CacheKey::Uploads => "uploads",
            CacheKey::Dashboard => "dashboard",
            CacheKey::Settings => "settings",
        }
    }

    /// Parse a key from its storage name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "policies" => Some(CacheKey::Policies),
            "uploads" => Some(CacheKey::Uploads),
            "dashboard" => Some(CacheKey::Dashboard),
            "settings" => Some(CacheKey::Settings),
            _ => None,
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CacheKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid cache key: {}", s))
    }
}
