//! Tiny v2 parser (`yarn-<version>-mergedv2.jar`)
//!
//! The newer artifact generation is a jar holding `mappings/mappings.tiny`.
//! Members are nested under their class by indentation; parameters,
//! local variables and comments are skipped.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::mapping::tiny_v1::{assign_names, resolve_namespaces};
use crate::mapping::traits::{FormatParser, ParseError};
use crate::mapping::types::{EntryKind, MappingEntry, NamingScheme};

/// Location of the mapping file inside the jar
pub const MAPPINGS_ENTRY: &str = "mappings/mappings.tiny";

pub struct TinyV2Parser;

impl FormatParser for TinyV2Parser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<MappingEntry>, ParseError> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).map_err(|e| ParseError::Archive(e.to_string()))?;
        let mut file = archive
            .by_name(MAPPINGS_ENTRY)
            .map_err(|e| ParseError::Archive(format!("{}: {}", MAPPINGS_ENTRY, e)))?;

        let mut text = String::new();
        file.read_to_string(&mut text)?;
        parse_tiny_v2(&text)
    }
}

/// Parse Tiny v2 text
pub fn parse_tiny_v2(text: &str) -> Result<Vec<MappingEntry>, ParseError> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| ParseError::InvalidHeader("empty mapping file".to_string()))?;

    let mut columns = header.split('\t');
    if columns.next() != Some("tiny") || columns.next() != Some("2") {
        return Err(ParseError::InvalidHeader(format!(
            "expected tiny v2 header, got {:?}",
            header
        )));
    }
    // minor version
    columns.next();
    let namespaces = resolve_namespaces(columns);

    let mut entries = Vec::new();
    let mut escaped_names = false;
    let mut current_class: Option<String> = None;
    let mut in_header = true;

    for line in lines {
        let depth = line.chars().take_while(|c| *c == '\t').count();
        let fields: Vec<&str> = line[depth..].split('\t').collect();

        if in_header && depth == 1 {
            if fields[0] == "escaped-names" {
                escaped_names = true;
            }
            continue;
        }

        match (depth, fields[0]) {
            (0, "c") => {
                in_header = false;
                let mut entry = MappingEntry::new(EntryKind::Class);
                assign(&mut entry, &namespaces, &fields[1..], escaped_names);
                current_class = entry.display_name().map(str::to_string);
                entries.push(entry);
            }
            (1, "m") | (1, "f") if fields.len() >= 2 => {
                let kind = if fields[0] == "m" {
                    EntryKind::Method
                } else {
                    EntryKind::Field
                };
                let mut entry = MappingEntry::new(kind);
                assign(&mut entry, &namespaces, &fields[2..], escaped_names);
                entry.owner = current_class.clone();
                entry.descriptor = Some(fields[1].to_string());
                entries.push(entry);
            }
            _ => {}
        }
    }

    debug!("Parsed {} tiny v2 entries", entries.len());
    Ok(entries)
}

fn assign(
    entry: &mut MappingEntry,
    namespaces: &[Option<NamingScheme>],
    names: &[&str],
    escaped: bool,
) {
    if escaped {
        let unescaped: Vec<String> = names.iter().map(|n| unescape(n)).collect();
        let borrowed: Vec<&str> = unescaped.iter().map(String::as_str).collect();
        assign_names(entry, namespaces, &borrowed);
    } else {
        assign_names(entry, namespaces, names);
    }
}

fn unescape(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
