use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static EVENT_ROWS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.b-statistics__table-events tbody tr").expect("static selector")
});
static BOUT_ROWS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.b-fight-details__table tbody tr").expect("static selector")
});
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));
static DATE_SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").expect("static selector"));
static FIGHTER_LINKS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href*=\"fighter-details\"]").expect("static selector")
});

/// One completed event from the statistics index.
#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    pub url: String,
    pub year: i32,
}

/// One bout as listed on an event page, winner first. The refs are
/// profile urls used as cache keys, never owned fighter state.
#[derive(Debug, Clone)]
pub struct Bout {
    pub winner_name: String,
    pub winner_ref: String,
    pub loser_name: String,
    pub loser_ref: String,
    pub event_year: i32,
}

/// Parse the completed-events index. The first listed row is the next
/// upcoming event and is dropped; rows missing a link or date are skipped.
pub fn parse_event_index(html: &str) -> Vec<Event> {
    let doc = Html::parse_document(html);
    let mut events = Vec::new();

    for row in doc.select(&EVENT_ROWS) {
        let Some(link) = row.select(&ANCHOR).next() else {
            continue;
        };
        let Some(date) = row.select(&DATE_SPAN).next() else {
            continue;
        };
        let Some(url) = link.value().attr("href") else {
            continue;
        };
        let Some(year) = parse_year(&element_text(&date)) else {
            continue;
        };
        events.push(Event {
            name: element_text(&link),
            url: url.to_string(),
            year,
        });
    }

    if !events.is_empty() {
        events.remove(0);
    }
    events
}

/// Parse the bout table of one event page. The source lists the winner's
/// link first in each row.
pub fn parse_event_bouts(html: &str, event_year: i32) -> Vec<Bout> {
    let doc = Html::parse_document(html);
    let mut bouts = Vec::new();

    for row in doc.select(&BOUT_ROWS) {
        let links = row.select(&FIGHTER_LINKS).collect::<Vec<_>>();
        let [winner, loser, ..] = links.as_slice() else {
            continue;
        };
        let (Some(winner_ref), Some(loser_ref)) =
            (winner.value().attr("href"), loser.value().attr("href"))
        else {
            continue;
        };
        bouts.push(Bout {
            winner_name: element_text(winner),
            winner_ref: winner_ref.to_string(),
            loser_name: element_text(loser),
            loser_ref: loser_ref.to_string(),
            event_year,
        });
    }
    bouts
}

/// Year from date text shaped like "November 02, 2024".
fn parse_year(raw: &str) -> Option<i32> {
    raw.split(',').nth(1)?.trim().parse().ok()
}

pub(crate) fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_HTML: &str = r#"
        <table class="b-statistics__table-events"><tbody>
          <tr><td><a href="http://stats.example/event/upcoming">Next Event</a>
              <span>December 01, 2024</span></td></tr>
          <tr><td><a href="http://stats.example/event/100">Fight Night 100</a>
              <span>November 02, 2024</span></td></tr>
          <tr><td><span>orphan row without link</span></td></tr>
          <tr><td><a href="http://stats.example/event/99">Fight Night 99</a>
              <span>October 05, 2024</span></td></tr>
        </tbody></table>"#;

    #[test]
    fn index_drops_upcoming_event_and_orphan_rows() {
        let events = parse_event_index(INDEX_HTML);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "Fight Night 100");
        assert_eq!(events[0].url, "http://stats.example/event/100");
        assert_eq!(events[0].year, 2024);
        assert_eq!(events[1].year, 2024);
    }

    #[test]
    fn bout_rows_yield_winner_then_loser() {
        let html = r#"
            <table class="b-fight-details__table"><tbody>
              <tr><td>
                <a href="http://stats.example/fighter-details/a1">Alice Ash</a>
                <a href="http://stats.example/fighter-details/b2">Bea Blue</a>
              </td></tr>
              <tr><td><a href="http://stats.example/other">not a fighter link</a></td></tr>
            </tbody></table>"#;
        let bouts = parse_event_bouts(html, 2023);
        assert_eq!(bouts.len(), 1);
        assert_eq!(bouts[0].winner_name, "Alice Ash");
        assert_eq!(bouts[0].loser_name, "Bea Blue");
        assert_eq!(bouts[0].winner_ref, "http://stats.example/fighter-details/a1");
        assert_eq!(bouts[0].event_year, 2023);
    }

    #[test]
    fn year_parses_from_month_day_year_text() {
        assert_eq!(parse_year("November 02, 2024"), Some(2024));
        assert_eq!(parse_year("garbage"), None);
    }
}
