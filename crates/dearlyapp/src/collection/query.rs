//! The filter → search → sort pipeline behind `sorted_cards`.

use crate::error::{DearlyError, Result};
use crate::model::Card;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Most recently scanned first.
    #[default]
    Newest,
    Oldest,
    /// Only favorites, in collection order. A filter rather than an ordering.
    Favorites,
}

impl SortOption {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::Oldest => "oldest",
            SortOption::Favorites => "favorites",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = DearlyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOption::Newest),
            "oldest" => Ok(SortOption::Oldest),
            "favorites" | "favourites" => Ok(SortOption::Favorites),
            _ => Err(DearlyError::Api(format!("Unknown sort option: {}", s))),
        }
    }
}

/// What the browsing view currently asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardQuery {
    pub sort: SortOption,
    /// Exact occasion match.
    pub occasion: Option<String>,
    pub search: Option<String>,
}

impl CardQuery {
    /// Applies the occasion filter, then the search, then the sort mode.
    pub fn apply<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut result: Vec<&Card> = cards
            .iter()
            .filter(|card| match &self.occasion {
                Some(occasion) => card.metadata.occasion.as_deref() == Some(occasion.as_str()),
                None => true,
            })
            .filter(|card| match &needle {
                Some(needle) => card.matches_search(needle),
                None => true,
            })
            .collect();

        match self.sort {
            SortOption::Newest => result.sort_by_key(|card| std::cmp::Reverse(card.date_scanned())),
            SortOption::Oldest => result.sort_by_key(|card| card.date_scanned()),
            SortOption::Favorites => result.retain(|card| card.is_favorite),
        }
        result
    }
}

/// Distinct non-empty occasions, sorted.
pub fn available_occasions(cards: &[Card]) -> Vec<String> {
    cards
        .iter()
        .filter_map(|card| card.metadata.occasion.as_deref())
        .filter(|occasion| !occasion.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
