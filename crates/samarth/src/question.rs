//! Question parameter extraction: free text into a structured query.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::EntityCatalog;

/// Default first region when the question names none.
pub const DEFAULT_REGION_A: &str = "Gujarat";

/// Default second region when the question names fewer than two.
pub const DEFAULT_REGION_B: &str = "Maharashtra";

/// Default window size in years when the question gives no signal.
pub const DEFAULT_WINDOW_YEARS: u32 = 5;

/// Literal year tokens (1900-2099).
static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());

/// An explicit "last N years" phrase.
static LAST_N_YEARS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"last\s+(\d+)\s+years?").unwrap());

/// The parameters of one comparison question. Built once per question and
/// immutable thereafter; every field is always populated, with absence of
/// signal resolving to the documented defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredQuery {
    pub region_a: String,
    pub region_b: String,
    pub crop_filter: Option<String>,
    pub window_years: u32,
}

/// Extract a structured query from a free-text question.
///
/// Regions and crops are matched by case-insensitive substring containment
/// against the catalog, ordered by first occurrence in the question text
/// (not catalog order, so "compare Kerala and Gujarat" keeps Kerala first).
/// Window resolution priority: two or more literal years span a window;
/// one literal year pins a single-year window; an explicit "last N years"
/// phrase sets the size; otherwise the default applies.
pub fn extract(question: &str, catalog: &EntityCatalog) -> StructuredQuery {
    let folded = question.to_lowercase();

    let regions = match_by_position(&folded, &catalog.regions);
    let crops = match_by_position(&folded, &catalog.crops);

    let years: Vec<i32> = YEAR_PATTERN
        .find_iter(&folded)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    let window_years = if years.len() >= 2 {
        let min = years.iter().min().copied().unwrap_or(0);
        let max = years.iter().max().copied().unwrap_or(0);
        (max - min + 1) as u32
    } else if years.len() == 1 {
        1
    } else if let Some(n) = last_n_years(&folded) {
        n
    } else {
        DEFAULT_WINDOW_YEARS
    };

    let region_a = regions
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_REGION_A.to_string());
    let region_b = regions.get(1).cloned().unwrap_or_else(|| {
        // Keep the pair distinct even when the single matched region is
        // itself the usual second default.
        if region_a == DEFAULT_REGION_B {
            DEFAULT_REGION_A.to_string()
        } else {
            DEFAULT_REGION_B.to_string()
        }
    });

    StructuredQuery {
        region_a,
        region_b,
        crop_filter: crops.into_iter().next(),
        window_years,
    }
}

/// Catalog names contained in the folded question, ordered by the index of
/// their first occurrence.
fn match_by_position(folded_question: &str, names: &[String]) -> Vec<String> {
    let mut hits: Vec<(usize, &String)> = names
        .iter()
        .filter_map(|name| {
            folded_question
                .find(&name.to_lowercase())
                .map(|index| (index, name))
        })
        .collect();
    hits.sort_by_key(|(index, _)| *index);
    hits.into_iter().map(|(_, name)| name.clone()).collect()
}

fn last_n_years(folded_question: &str) -> Option<u32> {
    LAST_N_YEARS_PATTERN
        .captures(folded_question)
        .and_then(|cap| cap[1].parse::<u32>().ok())
        .map(|n| n.max(1))
}
