//! Canonical names for the reservation categories.

use regex::Regex;
use std::sync::OnceLock;

static OBC_NCL: OnceLock<Regex> = OnceLock::new();

// Verbose spellings found in the admission forms. Keys are already trimmed and upper-cased.
const CATEGORY_ALIASES: [(&str, &str); 6] = [
    ("SCHEDULED CASTE (SC)", "SC"),
    ("SCHEDULED CAST (SC)", "SC"),
    ("SCHEDULEDCASTE(SC)", "SC"),
    ("SCHEDULED TRIBE (ST)", "ST"),
    ("SCHEDULED TRIBE(ST)", "ST"),
    ("SCHEDULEDTRIBE(ST)", "ST"),
];

fn obc_ncl() -> &'static Regex {
    OBC_NCL.get_or_init(|| {
        Regex::new(r"OBC(?:\s*[-\u{2013}\u{2014}]\s*|\s+)NCL").expect("static regex is valid")
    })
}

/// Canonicalizes a free-text category label.
///
/// The label is trimmed and upper-cased, the spellings of `OBC-NCL` are
/// collapsed, and the known verbose names are mapped to their short codes.
/// Unknown labels are kept as they are. Applying it twice gives the same result.
///
/// ```
/// use merit_engine::normalize_category;
///
/// assert_eq!(normalize_category(" obc - ncl"), "OBC-NCL");
/// assert_eq!(normalize_category("Scheduled Caste (SC)"), "SC");
/// assert_eq!(normalize_category("XYZ"), "XYZ");
/// ```
pub fn normalize_category(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let upper = raw.trim().to_uppercase();
    let collapsed = obc_ncl().replace_all(&upper, "OBC-NCL").into_owned();
    CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == collapsed)
        .map(|(_, code)| code.to_string())
        .unwrap_or(collapsed)
}

/// Missing labels stay missing.
pub fn normalize_category_opt(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obc_ncl_variants() {
        for s in [
            "OBC - NCL",
            "obc-ncl",
            "OBC-NCL",
            "OBC –NCL",
            "  Obc  -  Ncl ",
            "OBC NCL",
            "OBC—NCL",
        ] {
            assert_eq!(normalize_category(s), "OBC-NCL", "input {:?}", s);
        }
    }

    #[test]
    fn verbose_names() {
        assert_eq!(normalize_category("Scheduled Caste (SC)"), "SC");
        assert_eq!(normalize_category("SCHEDULED CAST (SC)"), "SC");
        assert_eq!(normalize_category("ScheduledCaste(SC)"), "SC");
        assert_eq!(normalize_category("Scheduled Tribe (ST)"), "ST");
        assert_eq!(normalize_category("scheduled tribe(st)"), "ST");
        assert_eq!(normalize_category(" SCHEDULEDTRIBE(ST) "), "ST");
    }

    #[test]
    fn unknown_is_kept() {
        assert_eq!(normalize_category("XYZ"), "XYZ");
        assert_eq!(normalize_category(" ews "), "EWS");
        assert_eq!(normalize_category("General"), "GENERAL");
        // Only the exact verbose spelling is recognized.
        assert_eq!(normalize_category("SCHEDULED CASTE"), "SCHEDULED CASTE");
    }

    #[test]
    fn empty_and_missing() {
        assert_eq!(normalize_category(""), "");
        assert_eq!(normalize_category("   "), "");
        assert_eq!(normalize_category_opt(None), None);
        assert_eq!(normalize_category_opt(Some("sc")), Some("SC".to_string()));
    }

    #[test]
    fn idempotent() {
        for s in [
            "",
            "  ",
            "obc - ncl",
            "OBC-NCL-NCL",
            "obc -- ncl",
            "Scheduled Caste (SC)",
            "scheduled tribe(st)",
            "general",
            "Straße",
            "XYZ",
            "pwd",
            "OBC - NCL (Central List)",
        ] {
            let once = normalize_category(s);
            assert_eq!(normalize_category(&once), once, "input {:?}", s);
        }
    }
}
