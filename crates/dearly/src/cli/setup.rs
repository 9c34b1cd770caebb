use clap::{Parser, Subcommand, ValueEnum};
use dearlyapp::collection::SortOption;
use dearlyapp::model::CardType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dearly",
    bin_name = "dearly",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Keep the greeting cards you receive", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage root (defaults to the OS data directory)
    #[arg(long, global = true, env = "DEARLY_ROOT", help_heading = "Options")]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CardTypeArg {
    Traditional,
    Flat,
}

impl From<CardTypeArg> for CardType {
    fn from(arg: CardTypeArg) -> Self {
        match arg {
            CardTypeArg::Traditional => CardType::Traditional,
            CardTypeArg::Flat => CardType::Flat,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
    Favorites,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SortOption::Newest,
            SortArg::Oldest => SortOption::Oldest,
            SortArg::Favorites => SortOption::Favorites,
        }
    }
}

/// Metadata flags shared by `scan` and `edit`.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct MetadataArgs {
    /// Who sent the card
    #[arg(long)]
    pub sender: Option<String>,

    /// Birthday, Holiday, ...
    #[arg(long)]
    pub occasion: Option<String>,

    /// Date the card was received (YYYY-MM-DD)
    #[arg(long)]
    pub received: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a scanned card from image files (front, back, inside left, inside right)
    #[command(display_order = 1)]
    Scan {
        #[arg(long = "type", value_enum, default_value = "traditional")]
        card_type: CardTypeArg,

        /// Face images in scan order
        #[arg(required = true, num_args = 1..)]
        images: Vec<PathBuf>,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// List cards
    #[command(alias = "ls", display_order = 2)]
    List {
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Only cards for this occasion
        #[arg(long)]
        occasion: Option<String>,

        /// Search sender, occasion and notes
        #[arg(short, long)]
        search: Option<String>,

        /// Print cards as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one card and the state of its faces
    #[command(alias = "v", display_order = 3)]
    Show {
        /// Index or UUID of the card
        selector: String,
    },

    /// Mark cards as favorites
    #[command(alias = "fav", display_order = 10)]
    Favorite {
        /// Indexes, ranges or UUIDs (e.g. 1 3-5)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Remove cards from favorites
    #[command(alias = "unfav", display_order = 11)]
    Unfavorite {
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Delete cards and their images
    #[command(alias = "rm", display_order = 12)]
    Delete {
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Edit a card's details. Fields not given are kept; pass "" to clear one.
    #[command(alias = "e", display_order = 13)]
    Edit {
        selector: String,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// List the occasions in use
    #[command(display_order = 20)]
    Occasions,

    /// Add sample cards
    #[command(display_order = 30)]
    Generate {
        #[arg(long, default_value_t = 10)]
        count: usize,

        /// Pause between cards, in milliseconds
        #[arg(long)]
        pause_ms: Option<u64>,
    },

    /// Remove orphaned image folders and report missing images
    #[command(display_order = 31)]
    Doctor,

    /// Delete every card and image
    #[command(display_order = 32)]
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}
