//! Terminal rendering. Every function returns a `String` so output can be tested
//! without a terminal; styling is dropped automatically when stdout is not a tty.

use chrono::{DateTime, Utc};
use console::{style, Style};
use dearlyapp::collection::BulkOutcome;
use dearlyapp::model::{Card, ImageSide};
use dearlyapp::store::DoctorReport;
use std::fmt::Write;
use std::path::PathBuf;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const COL_INDEX: usize = 4;
const COL_SENDER: usize = 20;
const COL_OCCASION: usize = 14;
const FAVORITE_MARKER: &str = "★";

/// What `show` found for one face.
pub enum FaceLine {
    Image {
        width: u32,
        height: u32,
        path: Option<PathBuf>,
    },
    Placeholder(&'static str),
}

fn muted() -> Style {
    Style::new().dim()
}

/// Pads or truncates `text` to exactly `width` terminal columns.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let elapsed = Utc::now()
        .signed_duration_since(timestamp)
        .to_std()
        .unwrap_or_default();
    let mut formatter = timeago::Formatter::new();
    formatter.num_items(1);
    formatter.convert(elapsed)
}

/// Rows are `(display index, card)`.
pub fn card_list(rows: &[(usize, &Card)], total: usize) -> String {
    if total == 0 {
        let hint = "No cards yet. Add one with `dearly scan` or `dearly generate`.";
        return format!("{}\n", muted().apply_to(hint));
    }
    if rows.is_empty() {
        return format!("{}\n", muted().apply_to("No cards match."));
    }

    let mut out = String::new();
    for (index, card) in rows {
        let marker = if card.is_favorite {
            style(FAVORITE_MARKER).yellow().to_string()
        } else {
            " ".to_string()
        };
        let sender = card.metadata.sender.as_deref().unwrap_or("Unknown sender");
        let occasion = card.metadata.occasion.as_deref().unwrap_or("");
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            style(format!("{:>width$}.", index, width = COL_INDEX - 1)).yellow(),
            marker,
            fit(sender, COL_SENDER),
            style(fit(occasion, COL_OCCASION)).cyan(),
            muted().apply_to(format_time_ago(card.date_scanned())),
        );
    }
    out
}

pub fn card_detail(card: &Card, faces: &[(ImageSide, FaceLine)]) -> String {
    let mut out = String::new();
    let title = card.metadata.sender.as_deref().unwrap_or("Unknown sender");
    let favorite = if card.is_favorite {
        format!(" {}", style(FAVORITE_MARKER).yellow())
    } else {
        String::new()
    };
    let _ = writeln!(out, "{}{}", style(title).bold(), favorite);
    let _ = writeln!(out, "{}", muted().apply_to(card.id()));

    let field = |out: &mut String, label: &str, value: &str| {
        let _ = writeln!(out, "  {} {}", muted().apply_to(fit(label, 10)), value);
    };
    field(&mut out, "Type", card.card_type().as_str());
    if let Some(occasion) = &card.metadata.occasion {
        field(&mut out, "Occasion", occasion);
    }
    if let Some(received) = card.metadata.date_received {
        let received = received.format("%Y-%m-%d").to_string();
        field(&mut out, "Received", &received);
    }
    field(
        &mut out,
        "Scanned",
        &format!(
            "{} ({})",
            card.date_scanned().format("%Y-%m-%d %H:%M"),
            format_time_ago(card.date_scanned())
        ),
    );
    if let Some(notes) = &card.metadata.notes {
        field(&mut out, "Notes", notes);
    }

    let _ = writeln!(out);
    for (side, line) in faces {
        let status = match line {
            FaceLine::Image {
                width,
                height,
                path,
            } => {
                let location = path
                    .as_ref()
                    .map(|p| format!("  {}", muted().apply_to(p.display())))
                    .unwrap_or_default();
                format!("{}x{}{}", width, height, location)
            }
            FaceLine::Placeholder(label) => {
                style(format!("[{} placeholder]", label)).red().to_string()
            }
        };
        let _ = writeln!(out, "  {} {}", fit(side.title(), 13), status);
    }
    out
}

pub fn bulk_outcome(verb: &str, outcome: &BulkOutcome) -> String {
    let mut out = String::new();
    if !outcome.succeeded.is_empty() {
        let noun = if outcome.succeeded.len() == 1 { "card" } else { "cards" };
        let _ = writeln!(
            out,
            "{}",
            style(format!("{} {} {}", verb, outcome.succeeded.len(), noun)).green()
        );
    }
    for (id, error) in &outcome.failed {
        let _ = writeln!(out, "{}", style(format!("Failed {}: {}", id, error)).red());
    }
    out
}

pub fn doctor_report(report: &DoctorReport) -> String {
    if report.is_clean() && report.missing_faces == 0 {
        return format!("{}\n", style("Everything is in order.").green());
    }
    let mut out = String::new();
    let rows = [
        ("Removed orphaned image folders:", report.removed_orphan_dirs),
        ("Faces pointing at missing files:", report.dangling_image_paths),
        ("Faces never saved:", report.missing_faces),
    ];
    for (label, count) in rows {
        let _ = writeln!(out, "{:<32} {}", label, count);
    }
    out
}

pub fn success(message: &str) -> String {
    format!("{}\n", style(message).green())
}

pub fn warning(message: &str) -> String {
    format!("{}\n", style(message).yellow())
}
