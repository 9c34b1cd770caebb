use crate::model::{CardType, ImageSide};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DearlyError {
    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Card already exists: {0}")]
    DuplicateCard(Uuid),

    #[error("Scan incomplete: captured {captured} of {required} faces")]
    IncompleteScan { captured: usize, required: usize },

    #[error("A {card_type} card has no {side} face")]
    SideNotInCard { card_type: CardType, side: ImageSide },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, DearlyError>;
