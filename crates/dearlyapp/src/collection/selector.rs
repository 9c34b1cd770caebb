//! Addressing cards from the command line.
//!
//! A selector is a 1-based position in the newest-first listing (`3`), an
//! inclusive range of positions (`2-5`) or a full card UUID.

use crate::error::{DearlyError, Result};
use crate::model::Card;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSelector {
    Index(usize),
    Range(usize, usize),
    Id(Uuid),
}

impl fmt::Display for CardSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardSelector::Index(index) => write!(f, "{}", index),
            CardSelector::Range(start, end) => write!(f, "{}-{}", start, end),
            CardSelector::Id(id) => write!(f, "{}", id),
        }
    }
}

fn parse_index(s: &str) -> Result<usize> {
    match s.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(DearlyError::Api(format!(
            "Invalid card selector: {} (expected an index from 1, a range or a UUID)",
            s
        ))),
    }
}

impl FromStr for CardSelector {
    type Err = DearlyError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(CardSelector::Id(id));
        }
        if let Some((start, end)) = s.split_once('-') {
            let start = parse_index(start)?;
            let end = parse_index(end)?;
            if start > end {
                return Err(DearlyError::Api(format!("Range {} is reversed", s)));
            }
            return Ok(CardSelector::Range(start, end));
        }
        parse_index(s).map(CardSelector::Index)
    }
}

/// Resolves selectors against `listing` into card ids, keeping first-seen order
/// and dropping repeats.
pub fn resolve_selectors(listing: &[&Card], selectors: &[CardSelector]) -> Result<Vec<Uuid>> {
    let at = |index: usize| -> Result<Uuid> {
        index
            .checked_sub(1)
            .and_then(|i| listing.get(i))
            .map(|card| card.id())
            .ok_or_else(|| DearlyError::Api(format!("Index {} not found", index)))
    };

    let mut ids: Vec<Uuid> = Vec::new();
    for selector in selectors {
        let resolved = match *selector {
            CardSelector::Index(index) => vec![at(index)?],
            CardSelector::Range(start, end) => {
                (start..=end).map(at).collect::<Result<Vec<_>>>()?
            }
            CardSelector::Id(id) => {
                if !listing.iter().any(|card| card.id() == id) {
                    return Err(DearlyError::CardNotFound(id));
                }
                vec![id]
            }
        };
        for id in resolved {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CardFaces, CardMetadata, CardType};

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|_| {
                Card::new(
                    Uuid::new_v4(),
                    CardFaces::from_paths(CardType::Flat, None, None, None, None),
                    CardMetadata::default(),
                )
            })
            .collect()
    }

    #[test]
    fn parses_index_range_and_uuid() {
        assert_eq!("3".parse::<CardSelector>().unwrap(), CardSelector::Index(3));
        assert_eq!(
            "2-4".parse::<CardSelector>().unwrap(),
            CardSelector::Range(2, 4)
        );
        let id = Uuid::new_v4();
        assert_eq!(
            id.to_string().parse::<CardSelector>().unwrap(),
            CardSelector::Id(id)
        );
        assert!("0".parse::<CardSelector>().is_err());
        assert!("4-2".parse::<CardSelector>().is_err());
        assert!("mom".parse::<CardSelector>().is_err());
    }

    #[test]
    fn resolves_in_order_without_repeats() {
        let cards = cards(4);
        let listing: Vec<&Card> = cards.iter().collect();
        let ids = resolve_selectors(
            &listing,
            &[
                CardSelector::Index(3),
                CardSelector::Range(1, 3),
                CardSelector::Id(cards[3].id()),
            ],
        )
        .unwrap();
        assert_eq!(
            ids,
            vec![cards[2].id(), cards[0].id(), cards[1].id(), cards[3].id()]
        );
    }

    #[test]
    fn out_of_range_and_unknown_ids_fail() {
        let cards = cards(2);
        let listing: Vec<&Card> = cards.iter().collect();
        for selector in [CardSelector::Index(3), CardSelector::Range(2, 3)] {
            assert!(resolve_selectors(&listing, &[selector]).is_err());
        }
        assert!(matches!(
            resolve_selectors(&listing, &[CardSelector::Id(Uuid::new_v4())]),
            Err(DearlyError::CardNotFound(_))
        ));
    }

    #[test]
    fn zero_positions_are_not_found() {
        let cards = cards(1);
        let listing: Vec<&Card> = cards.iter().collect();
        for selector in [CardSelector::Index(0), CardSelector::Range(0, 2)] {
            match resolve_selectors(&listing, &[selector]) {
                Err(DearlyError::Api(message)) => assert_eq!(message, "Index 0 not found"),
                other => panic!("expected Api error for {}, got {:?}", selector, other),
            }
        }
    }
}
