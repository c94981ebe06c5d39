use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::{Client, ClientMode, ClientType, Handle, Rect};

/// Bitmask over tag positions. Bit `n` set means "carries tag `n`".
pub type TagMask = u64;

/// Bit 0 is the reserved default tag. It always exists and catches every
/// client no tag matcher claimed.
pub const DEFAULT_TAG: TagMask = 1;

pub const MAX_TAGS: usize = TagMask::BITS as usize;

/// Drop bit `index` from a mask, shifting every higher bit down by one.
/// This is the client/view side of removing a tag from the table.
#[must_use]
pub fn remove_bit(mask: TagMask, index: usize) -> TagMask {
    let low = mask & ((1 << index) - 1);
    let high = mask.checked_shr(index as u32 + 1).unwrap_or(0);
    low | (high << index)
}

/// A compiled matcher pattern.
///
/// Thin regex wrapper so matchers can derive serde and compare in tests;
/// patterns serialize as their source text and recompile on the way in.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self(Regex::new(pattern)?))
    }

    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let source = String::deserialize(deserializer)?;
        Regex::new(&source).map(Pattern).map_err(serde::de::Error::custom)
    }
}

/// One predicate of a tag. A tag claims a client when any of its matchers
/// accepts it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Matcher {
    Name(Pattern),
    Instance(Pattern),
    Class(Pattern),
    Role(Pattern),
    Type(ClientType),
}

impl Matcher {
    #[must_use]
    pub fn matches<H: Handle>(&self, client: &Client<H>) -> bool {
        match self {
            Self::Name(p) => client.name.as_deref().is_some_and(|v| p.matches(v)),
            Self::Instance(p) => client.instance.as_deref().is_some_and(|v| p.matches(v)),
            Self::Class(p) => client.class.as_deref().is_some_and(|v| p.matches(v)),
            Self::Role(p) => client.role.as_deref().is_some_and(|v| p.matches(v)),
            Self::Type(t) => client.r#type == *t,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub matchers: Vec<Matcher>,
    /// Gravity forced onto matching clients.
    pub gravity: Option<usize>,
    /// Float geometry forced onto matching clients.
    pub geometry: Option<Rect>,
    /// Modes switched on for matching clients.
    pub modes: ClientMode,
}

impl Tag {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            matchers: vec![],
            gravity: None,
            geometry: None,
            modes: ClientMode::empty(),
        }
    }

    #[must_use]
    pub fn matches<H: Handle>(&self, client: &Client<H>) -> bool {
        self.matchers.iter().any(|m| m.matches(client))
    }
}

/// All known tags, in bit-position order.
///
/// Position 0 is the reserved default tag and can never be removed. Removing
/// any other tag slides the tags above it down one position, so bit `n` of a
/// `TagMask` always addresses `tags.get(n)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tags {
    list: Vec<Tag>,
}

impl Tags {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: vec![Tag::new("default")],
        }
    }

    /// Append a tag, returning its bit position. A duplicate name or a full
    /// table yields `None`.
    pub fn add_new(&mut self, tag: Tag) -> Option<usize> {
        if self.list.len() >= MAX_TAGS || self.find_named(&tag.name).is_some() {
            return None;
        }
        self.list.push(tag);
        Some(self.list.len() - 1)
    }

    /// Remove the tag at `index`. The default tag is refused.
    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        if index == 0 || index >= self.list.len() {
            return None;
        }
        Some(self.list.remove(index))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.list.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
        self.list.get_mut(index)
    }

    #[must_use]
    pub fn find_named(&self, name: &str) -> Option<usize> {
        self.list.iter().position(|t| t.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.list.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tag> {
        self.list.iter_mut()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.list.iter().map(|t| t.name.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl Default for Tags {
    fn default() -> Self {
        Self::new()
    }
}
