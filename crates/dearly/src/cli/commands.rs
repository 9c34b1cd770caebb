//! Command handlers: resolve selectors, drive the collection, print the result.

use super::render::{self, FaceLine};
use super::setup::{Commands, MetadataArgs};
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use dearlyapp::collection::{BulkOutcome, CardCollection, CardQuery, CardSelector};
use dearlyapp::generate;
use dearlyapp::images::ImageStorage;
use dearlyapp::init::{DearlyContext, DiskStore};
use dearlyapp::model::{CardMetadata, CardType};
use dearlyapp::scan::ScanSession;
use dearlyapp::store::DataStore;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

type Collection = CardCollection<DiskStore>;

pub fn dispatch(command: Commands, ctx: DearlyContext) -> Result<()> {
    let mut collection = ctx.collection;
    match command {
        Commands::Scan {
            card_type,
            images,
            metadata,
        } => scan(&mut collection, card_type.into(), &images, metadata),
        Commands::List {
            sort,
            occasion,
            search,
            json,
        } => {
            if let Some(sort) = sort {
                collection.set_sort_option(sort.into());
            }
            collection.set_occasion_filter(occasion);
            collection.set_search_text(search);
            list(&collection, json)
        }
        Commands::Show { selector } => show(&collection, &selector),
        Commands::Favorite { selectors } => bulk(&mut collection, &selectors, BulkAction::Favorite),
        Commands::Unfavorite { selectors } => {
            bulk(&mut collection, &selectors, BulkAction::Unfavorite)
        }
        Commands::Delete { selectors } => bulk(&mut collection, &selectors, BulkAction::Delete),
        Commands::Edit { selector, metadata } => edit(&mut collection, &selector, metadata),
        Commands::Occasions => {
            for occasion in collection.available_occasions() {
                println!("{}", occasion);
            }
            Ok(())
        }
        Commands::Generate { count, pause_ms } => {
            let pause = pause_ms.map(Duration::from_millis);
            let created = generate::sample_cards(&mut collection, count, pause)?;
            print!(
                "{}",
                render::success(&format!("Generated {} sample cards", created.len()))
            );
            Ok(())
        }
        Commands::Doctor => {
            let report = collection.doctor()?;
            print!("{}", render::doctor_report(&report));
            Ok(())
        }
        Commands::Reset { yes } => {
            if !yes {
                bail!("Refusing to delete every card without --yes");
            }
            let count = collection.len();
            collection.clear_all_data()?;
            print!("{}", render::success(&format!("Deleted {} cards", count)));
            Ok(())
        }
    }
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", value))
}

/// Applies the flags that were given on top of `base`. Empty strings clear a field.
fn merge_metadata(base: CardMetadata, args: MetadataArgs) -> Result<CardMetadata> {
    let mut merged = base;
    if let Some(sender) = args.sender {
        merged.sender = Some(sender);
    }
    if let Some(occasion) = args.occasion {
        merged.occasion = Some(occasion);
    }
    if let Some(notes) = args.notes {
        merged.notes = Some(notes);
    }
    if let Some(received) = args.received {
        merged.date_received = parse_date(&received)?;
    }
    Ok(merged.normalized())
}

fn parse_selectors(raw: &[String]) -> Result<Vec<CardSelector>> {
    raw.iter()
        .map(|s| s.parse::<CardSelector>().map_err(anyhow::Error::from))
        .collect()
}

fn resolve_one(collection: &Collection, raw: &str) -> Result<Uuid> {
    let selectors = parse_selectors(&[raw.to_string()])?;
    collection
        .resolve(&selectors)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No card matches {}", raw))
}

fn scan(
    collection: &mut Collection,
    card_type: CardType,
    images: &[PathBuf],
    metadata: MetadataArgs,
) -> Result<()> {
    let total = card_type.face_count();
    if images.len() > total {
        eprint!(
            "{}",
            render::warning(&format!(
                "A {} card has {} faces; ignoring {} extra image(s)",
                card_type,
                total,
                images.len() - total
            ))
        );
    }

    let mut pages = Vec::with_capacity(total);
    for path in images.iter().take(total) {
        let bytes = fs::read(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        pages.push(bytes);
    }

    let session = ScanSession::from_scanner_images(card_type, pages);
    if let Some(side) = session.next_side() {
        bail!(
            "A {} card needs {} images, got {}. Next: {}",
            card_type,
            total,
            session.completed_count(),
            side.instruction()
        );
    }
    let metadata = merge_metadata(CardMetadata::default(), metadata)?;
    let card = collection.add_scanned_card(session, metadata)?;

    let missing: Vec<&str> = card
        .faces()
        .iter()
        .filter(|(_, path)| path.is_none())
        .map(|(side, _)| side.title())
        .collect();
    if !missing.is_empty() {
        eprint!(
            "{}",
            render::warning(&format!(
                "Could not store: {} (shown as placeholders)",
                missing.join(", ")
            ))
        );
    }
    print!("{}", render::success(&format!("Saved card {}", card.id())));
    Ok(())
}

fn list(collection: &Collection, json: bool) -> Result<()> {
    let cards = collection.sorted_cards();
    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    // Indexes always refer to the unfiltered newest-first listing, so they stay
    // valid as selectors whatever the current view is.
    let positions: HashMap<Uuid, usize> = CardQuery::default()
        .apply(collection.all_cards())
        .iter()
        .enumerate()
        .map(|(i, card)| (card.id(), i + 1))
        .collect();
    let rows: Vec<_> = cards
        .into_iter()
        .filter_map(|card| positions.get(&card.id()).map(|index| (*index, card)))
        .collect();

    print!("{}", render::card_list(&rows, collection.len()));
    Ok(())
}

fn show(collection: &Collection, selector: &str) -> Result<()> {
    let id = resolve_one(collection, selector)?;
    let card = collection
        .card(&id)
        .ok_or_else(|| anyhow!("Card {} not found", id))?;

    let images = collection.store().images();
    let faces: Vec<_> = CardType::Traditional
        .sides()
        .iter()
        .map(|side| {
            let line = match collection.face_view(card, *side) {
                dearlyapp::collection::FaceView::Image(image) => FaceLine::Image {
                    width: image.width(),
                    height: image.height(),
                    path: card.image_path(*side).and_then(|p| images.full_path(p)),
                },
                dearlyapp::collection::FaceView::Placeholder { label, .. } => {
                    FaceLine::Placeholder(label)
                }
            };
            (*side, line)
        })
        .collect();

    print!("{}", render::card_detail(card, &faces));
    Ok(())
}

#[derive(Clone, Copy)]
enum BulkAction {
    Favorite,
    Unfavorite,
    Delete,
}

fn bulk(collection: &mut Collection, raw: &[String], action: BulkAction) -> Result<()> {
    let ids = collection.resolve(&parse_selectors(raw)?)?;

    collection.enter_selection_mode(None);
    for id in ids {
        collection.toggle_card_selection(id);
    }
    let (verb, outcome): (&str, BulkOutcome) = match action {
        BulkAction::Favorite => ("Favorited", collection.favorite_selected_cards()),
        BulkAction::Unfavorite => ("Unfavorited", collection.unfavorite_selected_cards()),
        BulkAction::Delete => ("Deleted", collection.delete_selected_cards()),
    };

    print!("{}", render::bulk_outcome(verb, &outcome));
    if !outcome.is_success() {
        bail!(
            "{} of {} cards failed",
            outcome.failed.len(),
            outcome.failed.len() + outcome.succeeded.len()
        );
    }
    Ok(())
}

fn edit(collection: &mut Collection, selector: &str, args: MetadataArgs) -> Result<()> {
    let id = resolve_one(collection, selector)?;
    let current = collection
        .card(&id)
        .map(|card| card.metadata.clone())
        .ok_or_else(|| anyhow!("Card {} not found", id))?;

    let metadata = merge_metadata(current, args)?;
    let card = collection.update_metadata(&id, metadata)?;
    print!(
        "{}",
        render::success(&format!(
            "Updated card from {}",
            card.metadata.sender.as_deref().unwrap_or("unknown sender")
        ))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields_and_clears_empty_ones() {
        let base = CardMetadata::default()
            .with_sender("Mom")
            .with_occasion("Birthday")
            .with_notes("old note");
        let args = MetadataArgs {
            occasion: Some("Holiday".to_string()),
            notes: Some("".to_string()),
            ..Default::default()
        };

        let merged = merge_metadata(base, args).unwrap();
        assert_eq!(merged.sender.as_deref(), Some("Mom"));
        assert_eq!(merged.occasion.as_deref(), Some("Holiday"));
        assert_eq!(merged.notes, None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-12-25").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 25)
        );
        assert_eq!(parse_date("  ").unwrap(), None);
        assert!(parse_date("25/12/2024").is_err());
    }
}
