//! Sequence I/O: FASTA parsing and reference resolution.

pub mod fasta;
pub mod repository;

pub use fasta::{is_fasta_file, parse_fasta_file, ParseError, SeqRecord};
pub use repository::{load_multifasta, parse_name_list, ReferenceRepository};
