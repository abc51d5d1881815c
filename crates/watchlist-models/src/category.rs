use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Watch status buckets an identity sorts movies into
///
/// The set is closed; every movie tracked by an identity lives in exactly
/// one of these lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Finished watching
    Watched,
    /// Currently watching
    Watching,
    /// Want to watch
    Planned,
    /// Paused for now
    Onhold,
    /// Stopped watching
    Dropped,
}

impl Category {
    /// All categories in storage order
    pub const ALL: [Category; 5] = [
        Category::Watched,
        Category::Watching,
        Category::Planned,
        Category::Onhold,
        Category::Dropped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Watched => "watched",
            Category::Watching => "watching",
            Category::Planned => "planned",
            Category::Onhold => "onhold",
            Category::Dropped => "dropped",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a category name is not one of the five known lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watched" => Ok(Category::Watched),
            "watching" => Ok(Category::Watching),
            "planned" => Ok(Category::Planned),
            "onhold" => Ok(Category::Onhold),
            "dropped" => Ok(Category::Dropped),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Scope of a removal: one list, or every list at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveTarget {
    All,
    Only(Category),
}

impl FromStr for RemoveTarget {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(RemoveTarget::All);
        }
        s.parse().map(RemoveTarget::Only)
    }
}

impl fmt::Display for RemoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveTarget::All => f.write_str("all"),
            RemoveTarget::Only(category) => category.fmt(f),
        }
    }
}
