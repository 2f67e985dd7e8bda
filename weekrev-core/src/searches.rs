//! The fixed search set. Order matters: it drives section order in the
//! rendered report.

use chrono::{Days, NaiveDate};
use weekrev_sdk::{GroupKey, SearchSpec, WeekWindow};

/// An open ticket that has not moved for this long is stale.
const STALE_AFTER_DAYS: u64 = 30;

const OPEN: &str = "Status != 'resolved' AND Status != 'rejected'";

pub fn search_set(window: &WeekWindow) -> Vec<SearchSpec> {
    let created = between("Created", window);
    let stale_cutoff = date_literal(window.end() - Days::new(STALE_AFTER_DAYS));

    vec![
        SearchSpec::new(
            created.clone(),
            GroupKey::County,
            "Tickets opened last week by County",
        ),
        SearchSpec::new(
            format!("Status = 'resolved' AND {}", between("Resolved", window)),
            GroupKey::Owner,
            "Tickets resolved last week by Owner",
        ),
        SearchSpec::new(
            between("Updated", window),
            GroupKey::Owner,
            "Tickets worked on last week by Owner",
        ),
        SearchSpec::new(
            format!("{} AND {}", created, OPEN),
            GroupKey::Owner,
            "Tickets opened and not resolved last week by Owner",
        ),
        SearchSpec::new(OPEN, GroupKey::Owner, "Open tickets by Owner"),
        SearchSpec::new(
            format!("{} AND LastUpdated < '{}'", OPEN, stale_cutoff),
            GroupKey::Owner,
            "Stale tickets by Owner",
        ),
    ]
}

fn between(field: &str, window: &WeekWindow) -> String {
    format!(
        "{field} > '{}' AND {field} < '{}'",
        date_literal(window.start()),
        date_literal(window.end())
    )
}

fn date_literal(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
