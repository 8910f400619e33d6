//! Common types for mapping entries

use std::fmt;

/// Kind of symbol a mapping entry renames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Class,
    Method,
    Field,
}

impl EntryKind {
    /// Returns the string representation of the entry kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Class => "class",
            EntryKind::Method => "method",
            EntryKind::Field => "field",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "class" => Ok(EntryKind::Class),
            "method" => Ok(EntryKind::Method),
            "field" => Ok(EntryKind::Field),
            other => Err(format!("unknown entry kind: {other}")),
        }
    }
}

/// One of the parallel name spaces applied to the same symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingScheme {
    /// Obfuscated names shipped in the product jar
    Official,
    /// Stable intermediate names (`class_1234`, `method_5678`)
    Intermediary,
    /// Human-assigned Yarn names
    Named,
}

impl NamingScheme {
    /// Every scheme, in the order "search all schemes" queries visit them
    pub const ALL: [NamingScheme; 3] = [
        NamingScheme::Official,
        NamingScheme::Intermediary,
        NamingScheme::Named,
    ];

    /// Returns the Tiny namespace name for this scheme
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingScheme::Official => "official",
            NamingScheme::Intermediary => "intermediary",
            NamingScheme::Named => "named",
        }
    }

    /// Resolves a namespace name from a Tiny header
    ///
    /// Unlike [`FromStr`](std::str::FromStr) this only accepts the exact
    /// namespace names, so unknown header columns are ignored.
    pub fn from_namespace(namespace: &str) -> Option<Self> {
        match namespace {
            "official" => Some(NamingScheme::Official),
            "intermediary" => Some(NamingScheme::Intermediary),
            "named" => Some(NamingScheme::Named),
            _ => None,
        }
    }

    /// Extracts this scheme's name from an entry
    pub fn name_of<'a>(&self, entry: &'a MappingEntry) -> Option<&'a str> {
        match self {
            NamingScheme::Official => entry.official.as_deref(),
            NamingScheme::Intermediary => entry.intermediary.as_deref(),
            NamingScheme::Named => entry.named.as_deref(),
        }
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NamingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "official" | "obfuscated" | "obf" => Ok(NamingScheme::Official),
            "intermediary" => Ok(NamingScheme::Intermediary),
            "named" | "yarn" => Ok(NamingScheme::Named),
            other => Err(format!("unknown naming scheme: {other}")),
        }
    }
}

/// A renamed symbol with one name per naming scheme
///
/// Any name may be absent; an absent name never matches a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub kind: EntryKind,
    pub official: Option<String>,
    pub intermediary: Option<String>,
    pub named: Option<String>,
    /// Owning class for methods and fields, in the most readable scheme available
    pub owner: Option<String>,
    /// JVM descriptor in the official namespace (methods and fields only)
    pub descriptor: Option<String>,
}

impl MappingEntry {
    /// Creates an entry of the given kind with no names set
    pub fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            official: None,
            intermediary: None,
            named: None,
            owner: None,
            descriptor: None,
        }
    }

    /// Sets the name for a scheme; empty names are stored as absent
    pub(crate) fn set_name(&mut self, scheme: NamingScheme, name: &str) {
        let value = (!name.is_empty()).then(|| name.to_string());
        match scheme {
            NamingScheme::Official => self.official = value,
            NamingScheme::Intermediary => self.intermediary = value,
            NamingScheme::Named => self.named = value,
        }
    }

    /// The most readable name this entry has (named, then intermediary, then official)
    pub fn display_name(&self) -> Option<&str> {
        self.named
            .as_deref()
            .or(self.intermediary.as_deref())
            .or(self.official.as_deref())
    }
}
