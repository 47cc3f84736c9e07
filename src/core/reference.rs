use serde::{Deserialize, Serialize};

use crate::core::types::ReferenceId;

/// One candidate reference sequence a read might originate from.
///
/// Created once per classification pass from the reference repository and
/// immutable for the lifetime of the pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// Unique identifier
    pub id: ReferenceId,

    /// Full nucleotide sequence (A/C/G/T/N and IUPAC codes)
    pub sequence: Vec<u8>,
}

impl Reference {
    pub fn new(id: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            id: ReferenceId::new(id),
            sequence: sequence.into(),
        }
    }

    /// Sequence length in bases
    #[must_use]
    pub fn len(&self) -> u64 {
        self.sequence.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_length() {
        let reference = Reference::new("R1", b"ACGTACGT".to_vec());
        assert_eq!(reference.len(), 8);
        assert!(!reference.is_empty());
    }

    #[test]
    fn test_empty_reference() {
        let reference = Reference::new("R1", Vec::new());
        assert!(reference.is_empty());
        assert_eq!(reference.len(), 0);
    }
}
