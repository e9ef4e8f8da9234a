use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::events::element_text;

static TITLE_NAME: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.b-content__title-highlight").expect("static selector")
});
static HISTORY_ROWS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.b-fight-details__table tbody tr").expect("static selector")
});
static RESULT_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("static selector"));
static FIGHTER_LINKS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href*=\"fighter-details\"]").expect("static selector")
});

/// One row of a fighter's bout listing. `result` is the uppercased
/// outcome tag as printed by the source (WIN, LOSS, DRAW, NC, ...).
#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub result: String,
    pub fighter_a: String,
    pub fighter_b: String,
}

/// A fighter page: the display name the source uses for the fighter
/// itself, plus the bout listing in the order the source prints it,
/// most recent first.
///
/// The own name must come from the page, not from the caller: the
/// self-identification formatting can differ from the name used to label
/// the same fighter as winner or loser elsewhere.
#[derive(Debug, Clone)]
pub struct FighterPage {
    pub own_name: String,
    pub rows: Vec<HistoryRow>,
}

/// Win-streak features computed strictly from bouts before an anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakFeatures {
    pub current_streak: u32,
    pub max_streak: u32,
}

pub fn parse_fighter_page(html: &str) -> Result<FighterPage, PipelineError> {
    let doc = Html::parse_document(html);

    let own_name = doc
        .select(&TITLE_NAME)
        .next()
        .map(|el| element_text(&el))
        .ok_or_else(|| PipelineError::ParseMismatch("fighter title name".to_string()))?;

    let mut rows = Vec::new();
    for row in doc.select(&HISTORY_ROWS) {
        let links = row.select(&FIGHTER_LINKS).collect::<Vec<_>>();
        let [a, b, ..] = links.as_slice() else {
            continue;
        };
        let Some(result_cell) = row.select(&RESULT_CELL).next() else {
            continue;
        };
        rows.push(HistoryRow {
            result: element_text(&result_cell).to_uppercase(),
            fighter_a: element_text(a),
            fighter_b: element_text(b),
        });
    }

    Ok(FighterPage { own_name, rows })
}

/// Locate the bout against `opponent` in the most-recent-first listing
/// and compute streaks from the strictly older bouts only.
///
/// The anchor row and everything listed before it (chronologically
/// at-or-after it) never contributes; this is the leakage boundary.
/// Callers absorb `AnchorNotFound` into the `{0, 0}` default.
pub fn reconstruct(page: &FighterPage, opponent: &str) -> Result<StreakFeatures, PipelineError> {
    let own = page.own_name.trim();
    let opponent = opponent.trim();

    let anchor = page.rows.iter().position(|row| {
        let a = row.fighter_a.trim();
        let b = row.fighter_b.trim();
        (a == own && b == opponent) || (a == opponent && b == own)
    });
    let Some(anchor) = anchor else {
        return Err(PipelineError::AnchorNotFound {
            opponent: opponent.to_string(),
        });
    };

    // Rows after the anchor are older; reverse them into chronological order.
    Ok(streaks_from_results(
        page.rows[anchor + 1..].iter().rev().map(|row| row.result.as_str()),
    ))
}

/// Walk outcome tags in chronological order: a win extends the current
/// streak, anything else resets it.
pub fn streaks_from_results<'a>(chronological: impl Iterator<Item = &'a str>) -> StreakFeatures {
    let mut current = 0u32;
    let mut max = 0u32;
    for result in chronological {
        if result.trim().eq_ignore_ascii_case("WIN") {
            current += 1;
        } else {
            current = 0;
        }
        max = max.max(current);
    }
    StreakFeatures {
        current_streak: current,
        max_streak: max,
    }
}
