//! Core data types for references, mapping evidence, and abundance tables.

pub mod abundance;
pub mod evidence;
pub mod reference;
pub mod types;

pub use abundance::AbundanceTable;
pub use evidence::{Interval, MappingEvidence};
pub use reference::Reference;
pub use types::{Assignment, ReferenceId, AMBIGUOUS_LABEL, UNMAPPED_LABEL};
