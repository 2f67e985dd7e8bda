use anyhow::Result;
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A ticket as returned by the tracker: raw field name mapped to value.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord(BTreeMap<String, String>);

impl TicketRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, field: K, value: V) {
        self.0.insert(field.into(), value.into());
    }

    /// Value of a field, or `None` when the tracker did not return it.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for TicketRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Ticket field used to bucket results for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    Owner,
    County,
}

impl GroupKey {
    /// Field name as the tracker spells it. County is a custom field.
    pub fn field_name(&self) -> &'static str {
        match self {
            GroupKey::Owner => "Owner",
            GroupKey::County => "CF.{County}",
        }
    }

    /// Header used for the field in rendered tables.
    pub fn column_label(&self) -> &'static str {
        match self {
            GroupKey::Owner => "Owner",
            GroupKey::County => "County",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One saved search: what to fetch, how to bucket it, and the section
/// title it renders under.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSpec {
    pub query: String,
    pub group_key: GroupKey,
    pub title: String,
}

impl SearchSpec {
    pub fn new<Q: Into<String>, T: Into<String>>(query: Q, group_key: GroupKey, title: T) -> Self {
        Self {
            query: query.into(),
            group_key,
            title: title.into(),
        }
    }

    /// Owner sections emphasize the highest-volume owners, so they sort
    /// descending; everything else keeps ascending count order.
    pub fn sort_direction(&self) -> SortDirection {
        if self.title.to_lowercase().contains("by owner") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// The reporting week, resolved once and consumed uniformly by all
/// query construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl WeekWindow {
    /// The week ending on `end` (seven days, half-open at the start).
    pub fn ending(end: NaiveDate) -> Self {
        let start = end - Days::new(7);
        Self { start, end }
    }

    pub fn current() -> Self {
        Self::ending(Local::now().date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Seam between the report pipeline and the ticketing service.
pub trait TicketSource {
    fn search(&self, spec: &SearchSpec) -> Result<Vec<TicketRecord>>;
}
