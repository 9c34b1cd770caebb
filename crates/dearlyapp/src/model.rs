//! # Domain Model
//!
//! The durable unit is the [`Card`]: one physical greeting card, its scanned
//! faces and the metadata the user attaches to it.
//!
//! ## Faces
//!
//! A card is either two-sided (a flat card: front and back) or traditional
//! (folded: front, back, inside-left, inside-right). [`CardFaces`] encodes that
//! shape as a variant so a flat card can never carry an inside face.
//!
//! `CardFaces` is generic over what each face holds:
//! - `CardFaces<Vec<u8>>`: raw captured images, on their way into storage.
//! - `CardFaces<Option<String>>`: relative image paths as stored on a record.
//!   A `None` face means the image could not be written and renders as a
//!   placeholder.
//!
//! ## Immutability
//!
//! `id`, `date_scanned` and the face paths are fixed when a card is built.
//! Only `is_favorite` and [`CardMetadata`] change afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{DearlyError, Result};

/// One physical side of a card. Used to namespace image files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSide {
    Front,
    Back,
    InsideLeft,
    InsideRight,
}

impl ImageSide {
    pub const ALL: [ImageSide; 4] = [
        ImageSide::Front,
        ImageSide::Back,
        ImageSide::InsideLeft,
        ImageSide::InsideRight,
    ];

    /// File stem inside the card's image directory (`<stem>.jpg`).
    pub fn file_stem(self) -> &'static str {
        match self {
            ImageSide::Front => "front",
            ImageSide::Back => "back",
            ImageSide::InsideLeft => "insideLeft",
            ImageSide::InsideRight => "insideRight",
        }
    }

    /// Human label, also used on placeholders for missing images.
    pub fn title(self) -> &'static str {
        match self {
            ImageSide::Front => "Front",
            ImageSide::Back => "Back",
            ImageSide::InsideLeft => "Inside Left",
            ImageSide::InsideRight => "Inside Right",
        }
    }

    /// What to ask the user to scan next.
    pub fn instruction(self) -> &'static str {
        match self {
            ImageSide::Front => "Scan the front cover of your card",
            ImageSide::Back => "Flip the card over and scan the back",
            ImageSide::InsideLeft => "Open the card and scan the left inside page",
            ImageSide::InsideRight => "Now scan the right inside page",
        }
    }
}

impl fmt::Display for ImageSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ImageSide {
    type Err = DearlyError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "front" => Ok(ImageSide::Front),
            "back" => Ok(ImageSide::Back),
            "insideleft" => Ok(ImageSide::InsideLeft),
            "insideright" => Ok(ImageSide::InsideRight),
            _ => Err(DearlyError::Api(format!("Unknown card side: {}", s))),
        }
    }
}

/// Physical shape of a card, which decides how many faces get scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// Folded card with four faces.
    Traditional,
    /// Postcard-style card with a front and a back.
    Flat,
}

impl CardType {
    pub fn sides(self) -> &'static [ImageSide] {
        match self {
            CardType::Traditional => &ImageSide::ALL,
            CardType::Flat => &ImageSide::ALL[..2],
        }
    }

    pub fn face_count(self) -> usize {
        self.sides().len()
    }

    pub fn has_side(self, side: ImageSide) -> bool {
        self.sides().contains(&side)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Traditional => "traditional",
            CardType::Flat => "flat",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = DearlyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "traditional" | "folded" => Ok(CardType::Traditional),
            "flat" | "two-sided" | "twosided" => Ok(CardType::Flat),
            _ => Err(DearlyError::Api(format!("Unknown card type: {}", s))),
        }
    }
}

/// The faces of a card, shaped by its [`CardType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardFaces<T> {
    TwoSided {
        front: T,
        back: T,
    },
    Traditional {
        front: T,
        back: T,
        inside_left: T,
        inside_right: T,
    },
}

impl<T> CardFaces<T> {
    /// Builds faces of the given type, asking `face` for every side the type has.
    /// Returns `None` as soon as one side yields nothing.
    pub fn build(
        card_type: CardType,
        mut face: impl FnMut(ImageSide) -> Option<T>,
    ) -> Option<Self> {
        Some(match card_type {
            CardType::Flat => CardFaces::TwoSided {
                front: face(ImageSide::Front)?,
                back: face(ImageSide::Back)?,
            },
            CardType::Traditional => CardFaces::Traditional {
                front: face(ImageSide::Front)?,
                back: face(ImageSide::Back)?,
                inside_left: face(ImageSide::InsideLeft)?,
                inside_right: face(ImageSide::InsideRight)?,
            },
        })
    }

    pub fn card_type(&self) -> CardType {
        match self {
            CardFaces::TwoSided { .. } => CardType::Flat,
            CardFaces::Traditional { .. } => CardType::Traditional,
        }
    }

    /// The value for `side`, or `None` when the card has no such face.
    pub fn get(&self, side: ImageSide) -> Option<&T> {
        match (self, side) {
            (CardFaces::TwoSided { front, .. }, ImageSide::Front)
            | (CardFaces::Traditional { front, .. }, ImageSide::Front) => Some(front),
            (CardFaces::TwoSided { back, .. }, ImageSide::Back)
            | (CardFaces::Traditional { back, .. }, ImageSide::Back) => Some(back),
            (CardFaces::Traditional { inside_left, .. }, ImageSide::InsideLeft) => {
                Some(inside_left)
            }
            (CardFaces::Traditional { inside_right, .. }, ImageSide::InsideRight) => {
                Some(inside_right)
            }
            (CardFaces::TwoSided { .. }, _) => None,
        }
    }

    /// Faces in scan order (front, back, inside-left, inside-right).
    pub fn iter(&self) -> impl Iterator<Item = (ImageSide, &T)> + '_ {
        self.card_type()
            .sides()
            .iter()
            .filter_map(move |side| self.get(*side).map(|value| (*side, value)))
    }

    pub fn map<U>(self, mut f: impl FnMut(ImageSide, T) -> U) -> CardFaces<U> {
        match self {
            CardFaces::TwoSided { front, back } => CardFaces::TwoSided {
                front: f(ImageSide::Front, front),
                back: f(ImageSide::Back, back),
            },
            CardFaces::Traditional {
                front,
                back,
                inside_left,
                inside_right,
            } => CardFaces::Traditional {
                front: f(ImageSide::Front, front),
                back: f(ImageSide::Back, back),
                inside_left: f(ImageSide::InsideLeft, inside_left),
                inside_right: f(ImageSide::InsideRight, inside_right),
            },
        }
    }

    pub fn as_ref(&self) -> CardFaces<&T> {
        match self {
            CardFaces::TwoSided { front, back } => CardFaces::TwoSided { front, back },
            CardFaces::Traditional {
                front,
                back,
                inside_left,
                inside_right,
            } => CardFaces::Traditional {
                front,
                back,
                inside_left,
                inside_right,
            },
        }
    }
}

impl CardFaces<Option<String>> {
    /// Stored relative path for `side`, if the card has that face and it was saved.
    pub fn path(&self, side: ImageSide) -> Option<&str> {
        self.get(side).and_then(|p| p.as_deref())
    }

    /// Rebuilds stored faces from the four path columns of a record.
    /// Inside paths are dropped for flat cards.
    pub fn from_paths(
        card_type: CardType,
        front: Option<String>,
        back: Option<String>,
        inside_left: Option<String>,
        inside_right: Option<String>,
    ) -> Self {
        match card_type {
            CardType::Flat => CardFaces::TwoSided { front, back },
            CardType::Traditional => CardFaces::Traditional {
                front,
                back,
                inside_left,
                inside_right,
            },
        }
    }
}

/// User-editable details, independent of the images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    pub sender: Option<String>,
    pub occasion: Option<String>,
    pub date_received: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl CardMetadata {
    /// Trims text fields and turns blank ones into `None`.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            sender: clean(self.sender),
            occasion: clean(self.occasion),
            date_received: self.date_received,
            notes: clean(self.notes),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_occasion(mut self, occasion: impl Into<String>) -> Self {
        self.occasion = Some(occasion.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_date_received(mut self, date: NaiveDate) -> Self {
        self.date_received = Some(date);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: Uuid,
    faces: CardFaces<Option<String>>,
    date_scanned: DateTime<Utc>,
    pub is_favorite: bool,
    pub metadata: CardMetadata,
}

impl Card {
    /// A freshly scanned card, stamped with the current time.
    pub fn new(id: Uuid, faces: CardFaces<Option<String>>, metadata: CardMetadata) -> Self {
        Self::with_date_scanned(id, faces, metadata, Utc::now())
    }

    /// A card whose scan date is known (records read back from storage, samples).
    pub fn with_date_scanned(
        id: Uuid,
        faces: CardFaces<Option<String>>,
        metadata: CardMetadata,
        date_scanned: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            faces,
            date_scanned,
            is_favorite: false,
            metadata: metadata.normalized(),
        }
    }

    pub fn favorited(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date_scanned(&self) -> DateTime<Utc> {
        self.date_scanned
    }

    pub fn faces(&self) -> &CardFaces<Option<String>> {
        &self.faces
    }

    pub fn card_type(&self) -> CardType {
        self.faces.card_type()
    }

    pub fn image_path(&self, side: ImageSide) -> Option<&str> {
        self.faces.path(side)
    }

    pub fn front_image_path(&self) -> Option<&str> {
        self.image_path(ImageSide::Front)
    }

    pub fn back_image_path(&self) -> Option<&str> {
        self.image_path(ImageSide::Back)
    }

    pub fn inside_left_image_path(&self) -> Option<&str> {
        self.image_path(ImageSide::InsideLeft)
    }

    pub fn inside_right_image_path(&self) -> Option<&str> {
        self.image_path(ImageSide::InsideRight)
    }

    /// Case-insensitive substring match over sender, occasion and notes.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        [
            self.metadata.sender.as_deref(),
            self.metadata.occasion.as_deref(),
            self.metadata.notes.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }
}
