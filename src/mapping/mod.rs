//! Mapping format layer
//! - types.rs: MappingEntry, EntryKind, NamingScheme
//! - traits.rs: FormatParser trait definition
//! - format.rs: artifact generations and on-disk format detection
//! - tiny_v1.rs: gzipped Tiny v1 parser
//! - tiny_v2.rs: Tiny v2 (mergedv2 jar) parser

pub mod format;
pub mod tiny_v1;
pub mod tiny_v2;
pub mod traits;
pub mod types;

pub use format::{ArtifactFormat, detect_format};
pub use tiny_v1::TinyV1Parser;
pub use tiny_v2::TinyV2Parser;
pub use traits::{FormatParser, ParseError};
pub use types::{EntryKind, MappingEntry, NamingScheme};
