//! Sample cards for trying the app out and for exercising storage at volume.
//!
//! Faces are drawn procedurally (off-white card stock, a coloured frame and a
//! row of marks telling the faces apart) and go through the normal
//! [`CardCollection`] add path, so they are stored exactly like scanned cards.

use crate::collection::CardCollection;
use crate::error::Result;
use crate::images::codec;
use crate::model::{Card, CardFaces, CardMetadata, CardType, ImageSide};
use crate::store::DataStore;
use chrono::{Duration, Utc};
use image::{DynamicImage, Rgb, RgbImage};
use std::thread;
use tracing::info;

pub const SENDERS: [&str; 5] = ["Mom", "Dad", "Grandma", "Best Friend", "Aunt Sarah"];
pub const OCCASIONS: [&str; 5] = ["Birthday", "Holiday", "Anniversary", "Thank You", "Get Well"];

const PALETTE: [[u8; 3]; 6] = [
    [214, 69, 65],
    [52, 120, 198],
    [76, 160, 90],
    [235, 160, 40],
    [140, 84, 180],
    [30, 150, 160],
];

const FACE_WIDTH: u32 = 300;
const FACE_HEIGHT: u32 = 420;
const CARD_STOCK: Rgb<u8> = Rgb([250, 248, 240]);

/// Draws one face of a sample card.
pub fn placeholder_face(color: [u8; 3], side: ImageSide) -> DynamicImage {
    let frame = Rgb(color);
    let inset = 16;
    let thickness = 8;
    let marks = match side {
        ImageSide::Front => 1,
        ImageSide::Back => 2,
        ImageSide::InsideLeft => 3,
        ImageSide::InsideRight => 4,
    };

    let image = RgbImage::from_fn(FACE_WIDTH, FACE_HEIGHT, |x, y| {
        let outer = x >= inset && y >= inset && x < FACE_WIDTH - inset && y < FACE_HEIGHT - inset;
        let inner = x >= inset + thickness
            && y >= inset + thickness
            && x < FACE_WIDTH - inset - thickness
            && y < FACE_HEIGHT - inset - thickness;
        if outer && !inner {
            return frame;
        }

        // Square marks along the bottom edge, one per face number.
        let mark_top = FACE_HEIGHT - 80;
        if (mark_top..mark_top + 24).contains(&y) && x >= 48 {
            let slot = (x - 48) / 40;
            if slot < marks && (x - 48) % 40 < 24 {
                return frame;
            }
        }
        CARD_STOCK
    });
    DynamicImage::ImageRgb8(image)
}

fn sample_faces(card_type: CardType, color: [u8; 3]) -> Result<CardFaces<Vec<u8>>> {
    // PNG so the store's JPEG pass is the only lossy step.
    let face = |side| codec::encode_png(&placeholder_face(color, side));
    Ok(match card_type {
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

/// Adds `count` sample cards to `collection`, sleeping `pause` between writes.
///
/// Every third card is flat, every third favorited. Scan dates are spread over
/// the past year.
pub fn sample_cards<S: DataStore>(
    collection: &mut CardCollection<S>,
    count: usize,
    pause: Option<std::time::Duration>,
) -> Result<Vec<Card>> {
    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        if i > 0 {
            if let Some(pause) = pause {
                thread::sleep(pause);
            }
        }

        let card_type = if i % 3 == 2 {
            CardType::Flat
        } else {
            CardType::Traditional
        };
        let faces = sample_faces(card_type, PALETTE[i % PALETTE.len()])?;

        let scanned = Utc::now() - Duration::days(((i * 37 + 11) % 365) as i64);
        let mut metadata = CardMetadata::default()
            .with_sender(SENDERS[i % SENDERS.len()])
            .with_occasion(OCCASIONS[(i / SENDERS.len() + i) % OCCASIONS.len()])
            .with_date_received((scanned - Duration::days((i % 5) as i64 + 1)).date_naive());
        if i % 2 == 0 {
            metadata = metadata.with_notes("This is a sample card generated for testing.");
        }

        let card = collection.add_with(&faces, |id, paths| {
            Card::with_date_scanned(id, paths, metadata, scanned).favorited(i % 3 == 0)
        })?;
        created.push(card);
    }
    info!(count = created.len(), "generated sample cards");
    Ok(created)
}
