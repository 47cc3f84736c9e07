use serde::{Deserialize, Serialize};

/// Unique identifier for a candidate reference (taxon or genome name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReferenceId(pub String);

impl ReferenceId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reserved abundance-table row for reads that mapped to no reference
pub const UNMAPPED_LABEL: &str = "UNK";

/// Reserved abundance-table row for reads that mapped to more than one reference
pub const AMBIGUOUS_LABEL: &str = "MULTIPLE";

/// Outcome of classifying one read against the reference set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    /// The read mapped to exactly one reference
    Mapped(ReferenceId),
    /// The read mapped to no reference
    Unmapped,
    /// The read mapped to two or more references
    Ambiguous,
}

impl Assignment {
    /// Label used for this outcome in abundance tables
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Mapped(id) => id.as_str(),
            Self::Unmapped => UNMAPPED_LABEL,
            Self::Ambiguous => AMBIGUOUS_LABEL,
        }
    }
}
