//! Which commands use which sounds.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;

/// Names from a slash-command tree root down to a node, optionally ending
/// in an option label.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlashPath(Vec<String>);

impl SlashPath {
    /// The empty path: the parent of top-level commands.
    pub fn root() -> Self {
        Self::default()
    }

    /// This path extended by one name.
    pub fn child(&self, name: &str) -> Self {
        let mut names = self.0.clone();
        names.push(name.to_owned());
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Number of names; a top-level command has length 1.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The path without its last name.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }
}

impl<S: Into<String>> FromIterator<S> for SlashPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for SlashPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join(" "))
    }
}

/// Something that triggers a sound.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum User {
    /// A text command, by name.
    Command(String),
    /// A slash command leaf or option, by path.
    Slash(SlashPath),
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(name) => write!(f, "command '{name}'"),
            Self::Slash(path) => write!(f, "slash command '{path}'"),
        }
    }
}

/// Sound name → the users referencing it.
///
/// Keys are the names as written in the referencing documents, so names
/// that no sound defines show up here too.
#[derive(Debug, Clone, Default)]
pub struct UsageIndex {
    uses: IndexMap<String, BTreeSet<User>>,
}

impl UsageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sound: &str, user: User) {
        self.uses.entry(sound.to_owned()).or_default().insert(user);
    }

    /// Add every use recorded in `other`.
    pub fn merge(&mut self, other: &UsageIndex) {
        for (sound, users) in other.iter() {
            self.uses
                .entry(sound.to_owned())
                .or_default()
                .extend(users.iter().cloned());
        }
    }

    pub fn users(&self, sound: &str) -> Option<&BTreeSet<User>> {
        self.uses.get(sound)
    }

    /// Whether `sound` has at least one user.
    pub fn is_used(&self, sound: &str) -> bool {
        self.uses.get(sound).is_some_and(|users| !users.is_empty())
    }

    /// Referenced sound names, in first-reference order.
    pub fn sounds(&self) -> impl Iterator<Item = &str> {
        self.uses.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<User>)> {
        self.uses.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.uses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }
}
