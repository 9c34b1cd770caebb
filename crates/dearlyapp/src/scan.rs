//! Capture of one card, before anything is persisted.
//!
//! A [`ScanSession`] collects raw face images in scan order. Nothing touches
//! storage until [`ScanSession::finish`] hands the faces to the collection, so
//! dropping a session is how a scan is cancelled.

use crate::error::{DearlyError, Result};
use crate::model::{CardFaces, CardType, ImageSide};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ScanSession {
    card_type: CardType,
    captured: HashMap<ImageSide, Vec<u8>>,
}

impl ScanSession {
    pub fn new(card_type: CardType) -> Self {
        Self {
            card_type,
            captured: HashMap::new(),
        }
    }

    /// Maps a batch from a document scanner onto faces by position.
    /// Images beyond the card's face count are ignored.
    pub fn from_scanner_images<I>(card_type: CardType, images: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let captured = card_type.sides().iter().copied().zip(images).collect();
        Self {
            card_type,
            captured,
        }
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    pub fn required_sides(&self) -> &'static [ImageSide] {
        self.card_type.sides()
    }

    /// First side in scan order that has not been captured yet.
    pub fn next_side(&self) -> Option<ImageSide> {
        self.required_sides()
            .iter()
            .copied()
            .find(|side| !self.captured.contains_key(side))
    }

    /// Stores `bytes` for `side`, replacing an earlier capture (a retake).
    pub fn capture(&mut self, side: ImageSide, bytes: Vec<u8>) -> Result<()> {
        if !self.card_type.has_side(side) {
            return Err(DearlyError::SideNotInCard {
                card_type: self.card_type,
                side,
            });
        }
        self.captured.insert(side, bytes);
        Ok(())
    }

    /// Captures the next missing side and returns which one it was.
    pub fn capture_next(&mut self, bytes: Vec<u8>) -> Result<ImageSide> {
        let side = self.next_side().ok_or_else(|| {
            DearlyError::Api(format!("All {} faces are already captured", self.total()))
        })?;
        self.capture(side, bytes)?;
        Ok(side)
    }

    pub fn is_captured(&self, side: ImageSide) -> bool {
        self.captured.contains_key(&side)
    }

    pub fn completed_count(&self) -> usize {
        self.captured.len()
    }

    pub fn total(&self) -> usize {
        self.card_type.face_count()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_count() == self.total()
    }

    pub fn finish(mut self) -> Result<CardFaces<Vec<u8>>> {
        let captured = self.completed_count();
        let required = self.total();
        CardFaces::build(self.card_type, |side| self.captured.remove(&side))
            .ok_or(DearlyError::IncompleteScan { captured, required })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(tag: u8) -> Vec<u8> {
        vec![tag; 4]
    }

    #[test]
    fn traditional_scan_walks_four_sides_in_order() {
        let mut session = ScanSession::new(CardType::Traditional);
        assert_eq!(session.total(), 4);
        assert_eq!(session.next_side(), Some(ImageSide::Front));

        assert_eq!(session.capture_next(bytes(1)).unwrap(), ImageSide::Front);
        assert_eq!(session.capture_next(bytes(2)).unwrap(), ImageSide::Back);
        assert_eq!(
            session.capture_next(bytes(3)).unwrap(),
            ImageSide::InsideLeft
        );
        assert!(!session.is_complete());
        assert_eq!(
            session.capture_next(bytes(4)).unwrap(),
            ImageSide::InsideRight
        );

        assert!(session.is_complete());
        assert_eq!(session.next_side(), None);
        assert!(session.capture_next(bytes(5)).is_err());

        let faces = session.finish().unwrap();
        assert_eq!(faces.get(ImageSide::InsideLeft), Some(&bytes(3)));
    }

    #[test]
    fn flat_scan_rejects_inside_faces() {
        let mut session = ScanSession::new(CardType::Flat);
        assert_eq!(
            session.required_sides(),
            &[ImageSide::Front, ImageSide::Back]
        );

        let err = session.capture(ImageSide::InsideLeft, bytes(1)).unwrap_err();
        assert!(matches!(
            err,
            DearlyError::SideNotInCard {
                card_type: CardType::Flat,
                side: ImageSide::InsideLeft
            }
        ));
        assert_eq!(session.completed_count(), 0);
    }

    #[test]
    fn retake_replaces_a_capture() {
        let mut session = ScanSession::new(CardType::Flat);
        session.capture(ImageSide::Front, bytes(1)).unwrap();
        session.capture(ImageSide::Front, bytes(9)).unwrap();
        session.capture(ImageSide::Back, bytes(2)).unwrap();

        assert_eq!(session.completed_count(), 2);
        let faces = session.finish().unwrap();
        assert_eq!(faces.get(ImageSide::Front), Some(&bytes(9)));
    }

    #[test]
    fn unfinished_scan_cannot_finish() {
        let mut session = ScanSession::new(CardType::Traditional);
        session.capture(ImageSide::Front, bytes(1)).unwrap();
        session.capture(ImageSide::InsideRight, bytes(4)).unwrap();
        assert_eq!(session.next_side(), Some(ImageSide::Back));

        match session.finish() {
            Err(DearlyError::IncompleteScan { captured, required }) => {
                assert_eq!(captured, 2);
                assert_eq!(required, 4);
            }
            other => panic!("expected IncompleteScan, got {:?}", other),
        }
    }

    #[test]
    fn scanner_batch_maps_by_position_and_drops_surplus() {
        let session = ScanSession::from_scanner_images(
            CardType::Flat,
            vec![bytes(1), bytes(2), bytes(3)],
        );
        assert!(session.is_complete());
        let faces = session.finish().unwrap();
        assert_eq!(faces.card_type(), CardType::Flat);
        assert_eq!(faces.get(ImageSide::Back), Some(&bytes(2)));
    }

    #[test]
    fn short_scanner_batch_is_incomplete() {
        let session =
            ScanSession::from_scanner_images(CardType::Traditional, vec![bytes(1), bytes(2)]);
        assert_eq!(session.completed_count(), 2);
        assert!(!session.is_complete());
        assert!(session.is_captured(ImageSide::Back));
        assert!(!session.is_captured(ImageSide::InsideLeft));
    }
}
