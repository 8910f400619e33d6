//! Kind and name filtering over a cached mapping set

use crate::mapping::types::{EntryKind, MappingEntry, NamingScheme};

/// How query text is compared against a scheme's name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive full-string equality
    Exact,
    /// Case-sensitive "ends with"
    Suffix,
}

impl MatchMode {
    pub fn matches(&self, name: &str, text: &str) -> bool {
        match self {
            MatchMode::Exact => name.to_lowercase() == text.to_lowercase(),
            MatchMode::Suffix => name.ends_with(text),
        }
    }
}

/// Filter entries of `kind` whose name matches `text`
///
/// With a scheme, only that scheme's name is tested. Without one, every
/// scheme is tested independently and an entry is returned once per
/// matching scheme. File order is preserved.
pub fn query<'a>(
    entries: &'a [MappingEntry],
    scheme: Option<NamingScheme>,
    kind: EntryKind,
    text: &str,
    mode: MatchMode,
) -> Vec<&'a MappingEntry> {
    let schemes: &[NamingScheme] = match &scheme {
        Some(scheme) => std::slice::from_ref(scheme),
        None => &NamingScheme::ALL,
    };

    entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .flat_map(|entry| {
            schemes
                .iter()
                .filter(move |scheme| {
                    scheme
                        .name_of(entry)
                        .is_some_and(|name| mode.matches(name, text))
                })
                .map(move |_| entry)
        })
        .collect()
}
