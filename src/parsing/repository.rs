//! Reference resolution: turning reference identities into sequences.
//!
//! Two sources are supported, matching how candidate lists arrive in
//! practice: a genome directory with one FASTA per reference
//! (`<name>.fa[.gz]` and friends), and a multi-FASTA optionally restricted
//! by a line-separated name list. A name that cannot be resolved is a
//! logged warning and a skip, never a fatal error.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::core::Reference;
use crate::parsing::fasta::{parse_fasta_file, ParseError};

/// Filename patterns tried when resolving a reference in a genome directory
const FASTA_EXTENSIONS: &[&str] = &["fa", "fasta", "fna", "fa.gz", "fasta.gz", "fna.gz"];

/// Resolves reference identities to FASTA files in a genome directory
#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    directory: PathBuf,
}

impl ReferenceRepository {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Path of the FASTA for one reference, `None` when no candidate exists
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<PathBuf> {
        for extension in FASTA_EXTENSIONS {
            let candidate = self.directory.join(format!("{name}.{extension}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    /// Load every named reference this repository can resolve.
    ///
    /// Unresolvable names and unparsable files are skipped with a warning.
    /// A multi-record FASTA contributes only its first record, under the
    /// requested name.
    #[must_use]
    pub fn load(&self, names: &[String]) -> Vec<Reference> {
        let mut references = Vec::new();
        for name in names {
            let Some(path) = self.lookup(name) else {
                warn!(reference = %name, directory = %self.directory.display(), "not found; skipping");
                continue;
            };
            match parse_fasta_file(&path) {
                Ok(records) => {
                    if let Some(record) = records.into_iter().next() {
                        references.push(Reference::new(name.clone(), record.sequence));
                    }
                }
                Err(err) => {
                    warn!(reference = %name, %err, "unreadable FASTA; skipping");
                }
            }
        }
        references
    }
}

/// Parse a line-separated list of reference names (blank lines ignored).
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read.
pub fn parse_name_list(path: &Path) -> Result<Vec<String>, ParseError> {
    let file = std::fs::File::open(path)?;
    let mut names = Vec::new();
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            names.push(trimmed.to_string());
        }
    }
    Ok(names)
}

/// Load references from a multi-FASTA, optionally restricted to a name
/// subset. Record names are trimmed to their first comma-separated field.
///
/// # Errors
///
/// Propagates `ParseError` from FASTA parsing.
pub fn load_multifasta(
    path: &Path,
    subset: Option<&[String]>,
) -> Result<Vec<Reference>, ParseError> {
    let records = parse_fasta_file(path)?;
    let mut references = Vec::new();

    for record in records {
        let name = record
            .name
            .split(',')
            .next()
            .unwrap_or(&record.name)
            .trim()
            .to_string();
        if let Some(wanted) = subset {
            if !wanted.iter().any(|w| w == &name) {
                continue;
            }
        }
        references.push(Reference::new(name, record.sequence));
    }

    if let Some(wanted) = subset {
        for name in wanted {
            if !references.iter().any(|r| r.id.as_str() == name) {
                warn!(reference = %name, "not present in multi-FASTA; skipping");
            }
        }
    }

    Ok(references)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_fasta(dir: &Path, filename: &str, content: &[u8]) {
        let mut file = std::fs::File::create(dir.join(filename)).unwrap();
        file.write_all(content).unwrap();
    }

    #[test]
    fn test_lookup_and_load() {
        let dir = TempDir::new().unwrap();
        write_fasta(dir.path(), "Blessica.fa", b">Blessica\nACGTACGT\n");

        let repo = ReferenceRepository::new(dir.path());
        assert!(repo.lookup("Blessica").is_some());
        assert!(repo.lookup("Missing").is_none());

        let references = repo.load(&["Blessica".to_string(), "Missing".to_string()]);
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].id.as_str(), "Blessica");
        assert_eq!(references[0].sequence, b"ACGTACGT");
    }

    #[test]
    fn test_parse_name_list_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("names.lsv");
        std::fs::write(&path, "Blessica\n\nD29\n  \n").unwrap();

        let names = parse_name_list(&path).unwrap();
        assert_eq!(names, vec!["Blessica".to_string(), "D29".to_string()]);
    }

    #[test]
    fn test_load_multifasta_with_subset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genomes.fa");
        std::fs::write(&path, ">Blessica,extra\nACGT\n>D29\nGGTT\n>Perseus\nTTAA\n").unwrap();

        let subset = vec!["Blessica".to_string(), "Perseus".to_string()];
        let references = load_multifasta(&path, Some(&subset)).unwrap();
        let names: Vec<&str> = references.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(names, vec!["Blessica", "Perseus"]);
    }

    #[test]
    fn test_load_multifasta_unrestricted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genomes.fa");
        std::fs::write(&path, ">A\nACGT\n>B\nGGTT\n").unwrap();

        let references = load_multifasta(&path, None).unwrap();
        assert_eq!(references.len(), 2);
    }
}
