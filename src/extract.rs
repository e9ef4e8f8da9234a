use std::collections::HashMap;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

static PROFILE_ITEMS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("li.b-list__box-list-item").expect("static selector")
});

/// Source label (lowercased, colon-stripped) to canonical field name.
/// Labels not listed here are ignored, so source format additions do not
/// break extraction.
pub const PROFILE_FIELD_MAP: &[(&str, &str)] = &[
    ("height", "height"),
    ("weight", "weight"),
    ("reach", "reach"),
    ("stance", "stance"),
    ("dob", "dob"),
    ("slpm", "slpm"),
    ("str. acc.", "stracc"),
    ("sapm", "sapm"),
    ("str. def", "strdef"),
    ("td avg.", "tdavg"),
    ("td acc.", "tdacc"),
    ("td def.", "tddef"),
    ("sub. avg.", "subavg"),
];

/// Raw profile fields for one fighter. Values are kept verbatim as the
/// source prints them, including the "--" placeholder; numeric
/// normalization belongs to the downstream processing stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityProfile {
    pub height: Option<String>,
    pub weight: Option<String>,
    pub reach: Option<String>,
    pub stance: Option<String>,
    pub dob: Option<String>,
    pub slpm: Option<String>,
    pub stracc: Option<String>,
    pub sapm: Option<String>,
    pub strdef: Option<String>,
    pub tdavg: Option<String>,
    pub tdacc: Option<String>,
    pub tddef: Option<String>,
    pub subavg: Option<String>,
}

impl EntityProfile {
    fn from_fields(mut fields: HashMap<&'static str, String>) -> Self {
        let mut take = |name: &str| fields.remove(name);
        Self {
            height: take("height"),
            weight: take("weight"),
            reach: take("reach"),
            stance: take("stance"),
            dob: take("dob"),
            slpm: take("slpm"),
            stracc: take("stracc"),
            sapm: take("sapm"),
            strdef: take("strdef"),
            tdavg: take("tdavg"),
            tdacc: take("tdacc"),
            tddef: take("tddef"),
            subavg: take("subavg"),
        }
    }
}

/// Pull the mapped profile fields out of a fighter page. Field order in
/// the document does not matter; absent fields stay `None`.
pub fn extract_profile(html: &str) -> EntityProfile {
    let doc = Html::parse_document(html);
    EntityProfile::from_fields(extract_fields(&doc, PROFILE_FIELD_MAP))
}

fn extract_fields(
    doc: &Html,
    field_map: &[(&str, &'static str)],
) -> HashMap<&'static str, String> {
    let mut out = HashMap::new();
    for item in doc.select(&PROFILE_ITEMS) {
        let text = item.text().collect::<String>();
        let Some((label, value)) = text.split_once(':') else {
            continue;
        };
        let label = label.trim().to_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if let Some((_, canonical)) = field_map.iter().find(|(src, _)| *src == label) {
            out.insert(*canonical, value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str, value: &str) -> String {
        format!("<li class=\"b-list__box-list-item\">{label}: {value}</li>")
    }

    #[test]
    fn extracts_mapped_fields_in_any_order() {
        let html = format!(
            "<ul>{}{}{}</ul>",
            item("SLpM", "4.42"),
            item("Height", "5' 11\""),
            item("TD Avg.", "1.90"),
        );
        let profile = extract_profile(&html);
        assert_eq!(profile.height.as_deref(), Some("5' 11\""));
        assert_eq!(profile.slpm.as_deref(), Some("4.42"));
        assert_eq!(profile.tdavg.as_deref(), Some("1.90"));
        assert_eq!(profile.weight, None);
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let html = format!("<ul>{}{}</ul>", item("Nickname", "The Count"), item("Reach", "74\""));
        let profile = extract_profile(&html);
        assert_eq!(profile.reach.as_deref(), Some("74\""));
    }

    #[test]
    fn placeholder_values_are_kept_verbatim() {
        let html = format!("<ul>{}</ul>", item("Reach", "--"));
        let profile = extract_profile(&html);
        assert_eq!(profile.reach.as_deref(), Some("--"));
    }

    #[test]
    fn lines_without_colon_are_skipped() {
        let html = "<ul><li class=\"b-list__box-list-item\">no delimiter here</li></ul>";
        assert_eq!(extract_profile(html), EntityProfile::default());
    }
}
