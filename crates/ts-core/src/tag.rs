//! Category tags attached to time entries.

use std::fmt;

use serde::{Serialize, Serializer};

/// Display name of the sentinel assigned to entries without tags.
pub const UNTAGGED_LABEL: &str = "UNTAGGED";

/// A normalized category tag.
///
/// Named tags are stored uppercase. Entries without any tags are attributed
/// to [`Tag::Untagged`], which never collides with a user tag of the same
/// spelling and sorts after every named tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// A user-supplied category, uppercased.
    Named(String),
    /// Sentinel for entries that carried no tags.
    Untagged,
}

impl Tag {
    /// Creates a named tag, normalizing case.
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::Named(name.as_ref().to_uppercase())
    }

    /// Returns the label shown in column headers and descriptions.
    pub fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Untagged => UNTAGGED_LABEL,
        }
    }

    pub const fn is_untagged(&self) -> bool {
        matches!(self, Self::Untagged)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}
