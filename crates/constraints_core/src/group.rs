//! Validation groups.
//!
//! A group is a tag that selects which constraints take part in a validation
//! call. Constraints declared without groups belong to [`Group::DEFAULT`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A validation group identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(Cow<'static, str>);

impl Group {
    /// The implicit group of constraints declared without groups, and of
    /// validation calls issued without groups.
    pub const DEFAULT: Group = Group(Cow::Borrowed("default"));

    /// Creates a group from a static name.
    pub const fn named(name: &'static str) -> Self {
        Group(Cow::Borrowed(name))
    }

    /// Creates a group from an owned name.
    pub fn new(name: impl Into<String>) -> Self {
        Group(Cow::Owned(name.into()))
    }

    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the default group.
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Group {
    fn from(name: &'static str) -> Self {
        Group::named(name)
    }
}

impl From<String> for Group {
    fn from(name: String) -> Self {
        Group::new(name)
    }
}
