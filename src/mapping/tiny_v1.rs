//! Tiny v1 parser (`yarn-<version>-tiny.gz`)
//!
//! The older artifact generation: a gzipped, tab separated text file.
//!
//! ```text
//! v1	official	intermediary	named
//! CLASS	a	net/minecraft/class_1	net/minecraft/block/Block
//! METHOD	a	()V	b	method_1	tick
//! FIELD	a	I	c	field_1	age
//! ```

use std::collections::HashMap;
use std::io::Read;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::mapping::traits::{FormatParser, ParseError};
use crate::mapping::types::{EntryKind, MappingEntry, NamingScheme};

pub struct TinyV1Parser;

impl FormatParser for TinyV1Parser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<MappingEntry>, ParseError> {
        let mut text = String::new();
        GzDecoder::new(bytes)
            .read_to_string(&mut text)
            .map_err(|e| ParseError::Decompress(e.to_string()))?;
        parse_tiny_v1(&text)
    }
}

/// Parse uncompressed Tiny v1 text
pub fn parse_tiny_v1(text: &str) -> Result<Vec<MappingEntry>, ParseError> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| ParseError::InvalidHeader("empty mapping file".to_string()))?;

    let mut columns = header.split('\t');
    if columns.next() != Some("v1") {
        return Err(ParseError::InvalidHeader(format!(
            "expected tiny v1 header, got {:?}",
            header
        )));
    }
    let namespaces = resolve_namespaces(columns);

    let mut entries = Vec::new();
    // official class name -> most readable class name
    let mut class_names: HashMap<String, String> = HashMap::new();

    for line in lines {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let (kind, owner, descriptor, names) = match fields[0] {
            "CLASS" => (EntryKind::Class, None, None, &fields[1..]),
            "METHOD" if fields.len() >= 3 => (
                EntryKind::Method,
                Some(fields[1]),
                Some(fields[2]),
                &fields[3..],
            ),
            "FIELD" if fields.len() >= 3 => (
                EntryKind::Field,
                Some(fields[1]),
                Some(fields[2]),
                &fields[3..],
            ),
            _ => {
                debug!("Skipping unrecognized tiny v1 line: {}", line);
                continue;
            }
        };

        let mut entry = MappingEntry::new(kind);
        assign_names(&mut entry, &namespaces, names);
        entry.owner = owner.map(str::to_string);
        entry.descriptor = descriptor.map(str::to_string);

        if kind == EntryKind::Class
            && let (Some(official), Some(display)) = (&entry.official, entry.display_name())
        {
            class_names.insert(official.clone(), display.to_string());
        }

        entries.push(entry);
    }

    // Member owners are written in the official namespace
    for entry in &mut entries {
        if let Some(readable) = entry.owner.as_ref().and_then(|o| class_names.get(o)) {
            entry.owner = Some(readable.clone());
        }
    }

    debug!("Parsed {} tiny v1 entries", entries.len());
    Ok(entries)
}

/// Map header namespace columns to naming schemes; unknown columns are `None`
pub(crate) fn resolve_namespaces<'a>(
    columns: impl Iterator<Item = &'a str>,
) -> Vec<Option<NamingScheme>> {
    columns.map(NamingScheme::from_namespace).collect()
}

/// Assign name columns to an entry following the header order
pub(crate) fn assign_names(
    entry: &mut MappingEntry,
    namespaces: &[Option<NamingScheme>],
    names: &[&str],
) {
    for (scheme, name) in namespaces.iter().zip(names) {
        if let Some(scheme) = scheme {
            entry.set_name(*scheme, name);
        }
    }
}
