//! Group-count fold over fetched ticket records.

use indexmap::IndexMap;
use weekrev_sdk::{SortDirection, TicketRecord};

/// Counts per group label, in first-seen order. Insertion order is the
/// tie-break when counts are equal, so the map must preserve it.
pub type GroupCount = IndexMap<String, u64>;

/// Label used when a ticket has no value for the grouping field.
pub const MISSING_LABEL: &str = "None";

const MULTI_VALUE_SEPARATOR: char = ',';

/// Counts tickets per value of `field`. A comma-joined value counts
/// once per trimmed sub-value; empty sub-values (trailing commas) are
/// dropped. Missing or empty fields count under [`MISSING_LABEL`].
pub fn aggregate(records: &[TicketRecord], field: &str) -> GroupCount {
    let mut counts = GroupCount::new();

    for record in records {
        let value = record.field(field).unwrap_or_default();
        if value.is_empty() {
            bump(&mut counts, MISSING_LABEL);
        } else if value.contains(MULTI_VALUE_SEPARATOR) {
            for part in value.split(MULTI_VALUE_SEPARATOR) {
                let part = part.trim();
                if !part.is_empty() {
                    bump(&mut counts, part);
                }
            }
        } else {
            bump(&mut counts, value);
        }
    }

    counts
}

fn bump(counts: &mut GroupCount, label: &str) {
    if let Some(count) = counts.get_mut(label) {
        *count += 1;
    } else {
        counts.insert(label.to_string(), 1);
    }
}

/// Orders the counts for display. `sort_by_key` is stable, so labels
/// with equal counts keep their first-seen order.
pub fn sorted_totals(counts: &GroupCount, direction: SortDirection) -> Vec<(String, u64)> {
    let mut totals: Vec<(String, u64)> = counts
        .iter()
        .map(|(label, count)| (label.clone(), *count))
        .collect();

    match direction {
        SortDirection::Ascending => totals.sort_by_key(|(_, count)| *count),
        SortDirection::Descending => totals.sort_by_key(|(_, count)| std::cmp::Reverse(*count)),
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(field: &str, value: &str) -> TicketRecord {
        let mut record = TicketRecord::new();
        record.set(field, value);
        record
    }

    #[test]
    fn counts_by_owner() {
        let records = vec![
            record("Owner", "alice"),
            record("Owner", "bob"),
            record("Owner", "alice"),
        ];
        let counts = aggregate(&records, "Owner");
        assert_eq!(counts.get("alice"), Some(&2));
        assert_eq!(counts.get("bob"), Some(&1));
    }

    #[test]
    fn missing_and_empty_fields_count_as_none() {
        let records = vec![record("Owner", "alice"), record("Owner", ""), TicketRecord::new()];
        let counts = aggregate(&records, "Owner");
        assert_eq!(counts.get(MISSING_LABEL), Some(&2));
        assert_eq!(counts.get("alice"), Some(&1));
    }

    #[test]
    fn comma_joined_values_count_each_part() {
        let records = vec![
            record("CF.{County}", "Jones"),
            record("CF.{County}", "Jones,Smith"),
        ];
        let counts = aggregate(&records, "CF.{County}");
        assert_eq!(counts.get("Jones"), Some(&2));
        assert_eq!(counts.get("Smith"), Some(&1));
        assert_eq!(counts.get("Jones,Smith"), None);
    }

    #[test]
    fn split_parts_are_trimmed() {
        let records = vec![record("CF.{County}", "Jones, Smith")];
        let counts = aggregate(&records, "CF.{County}");
        assert_eq!(counts.get("Smith"), Some(&1));
    }

    #[test]
    fn no_ticket_is_dropped_or_double_counted() {
        let records = vec![
            record("CF.{County}", "Jones"),
            record("CF.{County}", "Jones,Smith"),
            record("CF.{County}", ""),
            record("Owner", "alice"),
        ];
        let counts = aggregate(&records, "CF.{County}");
        // 2 single-valued + 1 record split into 2 + 1 missing-field.
        let total: u64 = counts.values().sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn descending_sort_is_non_increasing() {
        let records = vec![
            record("Owner", "alice"),
            record("Owner", "bob"),
            record("Owner", "alice"),
        ];
        let counts = aggregate(&records, "Owner");
        let totals = sorted_totals(&counts, SortDirection::Descending);
        assert_eq!(
            totals,
            vec![("alice".to_string(), 2), ("bob".to_string(), 1)]
        );
    }

    #[test]
    fn ascending_ties_keep_first_seen_order() {
        let records = vec![
            record("Owner", "carol"),
            record("Owner", "alice"),
            record("Owner", "bob"),
        ];
        let counts = aggregate(&records, "Owner");
        let totals = sorted_totals(&counts, SortDirection::Ascending);
        let labels: Vec<&str> = totals.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn empty_record_list_yields_empty_counts() {
        let counts = aggregate(&[], "Owner");
        assert!(counts.is_empty());
        assert!(sorted_totals(&counts, SortDirection::Descending).is_empty());
    }
}
