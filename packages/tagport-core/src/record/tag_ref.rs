//! Weak tag references and their explicit resolution.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Four-character tag group code (e.g. "bitm", "rmd ").
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagGroup(pub [u8; 4]);

impl TagGroup {
    pub const fn new(code: [u8; 4]) -> Self {
        Self(code)
    }
}

impl FromStr for TagGroup {
    type Err = String;

    /// Parses up to four ASCII characters, right-padding with spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > 4 || !s.is_ascii() {
            return Err(format!("invalid tag group '{}'", s));
        }
        let mut code = [b' '; 4];
        code[..s.len()].copy_from_slice(s.as_bytes());
        Ok(Self(code))
    }
}

impl TryFrom<String> for TagGroup {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TagGroup> for String {
    fn from(group: TagGroup) -> Self {
        group.to_string()
    }
}

impl fmt::Display for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self.0.iter().map(|&b| b as char).collect();
        f.write_str(text.trim_end())
    }
}

impl fmt::Debug for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagGroup({:?})", self.to_string())
    }
}

/// Non-owning handle to a tag in an external cache.
///
/// A reference never keeps its target alive and may point at a tag the
/// cache does not hold; resolution goes through [`TagCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagReference {
    pub group: TagGroup,
    pub index: u32,
}

impl TagReference {
    pub fn new(group: TagGroup, index: u32) -> Self {
        Self { group, index }
    }

    /// Looks the reference up in `cache`.
    pub fn resolve<'c, C: TagCache + ?Sized>(&self, cache: &'c C) -> Option<&'c C::Entry> {
        cache.resolve(self)
    }
}

impl fmt::Display for TagReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}.{}", self.index, self.group)
    }
}

/// External tag storage that weak references resolve against.
pub trait TagCache {
    type Entry;

    /// Returns the entry for `reference`, or `None` if it is absent or the
    /// group does not match.
    fn resolve(&self, reference: &TagReference) -> Option<&Self::Entry>;
}

/// In-memory tag cache keyed by index.
#[derive(Debug, Default)]
pub struct MemoryTagCache<E> {
    entries: HashMap<u32, (TagGroup, E)>,
}

impl<E> MemoryTagCache<E> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, group: TagGroup, index: u32, entry: E) -> TagReference {
        self.entries.insert(index, (group, entry));
        TagReference::new(group, index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> TagCache for MemoryTagCache<E> {
    type Entry = E;

    fn resolve(&self, reference: &TagReference) -> Option<&E> {
        self.entries
            .get(&reference.index)
            .filter(|(group, _)| *group == reference.group)
            .map(|(_, entry)| entry)
    }
}
