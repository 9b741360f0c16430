//! Provenance tagging for resolved values

use serde::{Deserialize, Serialize};

/// The resolver tier that produced a value
///
/// Used purely for attribution: callers check it to decide whether to show a
/// "demo data" banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    /// Fresh from the remote backend
    BackendApi,

    /// Last value persisted in the local cache
    Cache,

    /// Static demo or default data
    MockData,
}

impl Source {
    /// Get the source tag as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::BackendApi => "BACKEND_API",
            Source::Cache => "CACHE",
            Source::MockData => "MOCK_DATA",
        }
    }

    /// Whether the value did not come from the backend
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Source::BackendApi)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value tagged with the tier that produced it
///
/// A successful result always carries data; a failed one carries an error
/// message instead. The source is present either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved<T> {
    success: bool,
    data: Option<T>,
    source: Source,
    error: Option<String>,
}

impl<T> Resolved<T> {
    /// Create a successful result
    pub fn success(data: T, source: Source) -> Self {
        Self {
            success: true,
            data: Some(data),
            source,
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>, source: Source) -> Self {
        Self {
            success: false,
            data: None,
            source,
            error: Some(error.into()),
        }
    }

    /// Whether the operation produced a value
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The tier that produced (or failed to produce) the value
    pub fn source(&self) -> Source {
        self.source
    }

    /// The resolved value, if any
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// The error message of a failed result
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Consume the result, returning the value if any
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Convert into a `Result`, keeping the source on both sides
    pub fn into_result(self) -> Result<(T, Source), (String, Source)> {
        match self.data {
            Some(data) if self.success => Ok((data, self.source)),
            _ => Err((
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
                self.source,
            )),
        }
    }

    /// Map the carried value, keeping provenance
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Resolved<U> {
        Resolved {
            success: self.success,
            data: self.data.map(f),
            source: self.source,
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_tags() {
        assert_eq!(Source::BackendApi.to_string(), "BACKEND_API");
        assert_eq!(
            serde_json::to_string(&Source::MockData).unwrap(),
            "\"MOCK_DATA\""
        );
        assert!(!Source::BackendApi.is_fallback());
        assert!(Source::Cache.is_fallback());
    }

    #[test]
    fn test_failure_carries_no_data() {
        let result: Resolved<u32> = Resolved::failure("invalid credentials", Source::BackendApi);
        assert!(!result.is_success());
        assert!(result.data().is_none());
        assert_eq!(result.error(), Some("invalid credentials"));
        assert_eq!(result.source(), Source::BackendApi);
    }

    #[test]
    fn test_into_result() {
        let ok = Resolved::success(7, Source::Cache).into_result();
        assert_eq!(ok, Ok((7, Source::Cache)));

        let err = Resolved::<u32>::failure("boom", Source::BackendApi).into_result();
        assert_eq!(err, Err(("boom".to_string(), Source::BackendApi)));
    }
}
