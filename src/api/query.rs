// src/api/query.rs
//! Database query bodies in the Notion filter language.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

/// A condition database pages must meet.
#[derive(Debug, Clone, PartialEq)]
pub enum PageFilter {
    /// The checkbox `property` is ticked.
    Checked { property: String },
    /// The page was edited strictly after the instant.
    EditedAfter(DateTime<Utc>),
    /// The date `property` is on or after `since`.
    DateOnOrAfter {
        property: String,
        since: DateTime<Utc>,
    },
    And(Vec<PageFilter>),
    Or(Vec<PageFilter>),
}

impl PageFilter {
    pub fn to_json(&self) -> Value {
        match self {
            PageFilter::Checked { property } => json!({
                "property": property,
                "checkbox": { "equals": true }
            }),
            PageFilter::EditedAfter(at) => json!({
                "timestamp": "last_edited_time",
                "last_edited_time": { "after": timestamp(at) }
            }),
            PageFilter::DateOnOrAfter { property, since } => json!({
                "property": property,
                "date": { "on_or_after": timestamp(since) }
            }),
            PageFilter::And(filters) => json!({ "and": Self::all_to_json(filters) }),
            PageFilter::Or(filters) => json!({ "or": Self::all_to_json(filters) }),
        }
    }

    fn all_to_json(filters: &[PageFilter]) -> Vec<Value> {
        filters.iter().map(PageFilter::to_json).collect()
    }
}

/// What query results are ordered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    LastEditedTime,
    Property(String),
}

/// A descending sort; newest first is the only order discovery needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSort(pub SortKey);

impl PageSort {
    pub fn to_json(&self) -> Value {
        match &self.0 {
            SortKey::LastEditedTime => json!({
                "timestamp": "last_edited_time",
                "direction": "descending"
            }),
            SortKey::Property(property) => json!({
                "property": property,
                "direction": "descending"
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseQuery {
    pub filter: PageFilter,
    pub sorts: Vec<PageSort>,
}

impl DatabaseQuery {
    pub fn new(filter: PageFilter) -> Self {
        Self {
            filter,
            sorts: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, key: SortKey) -> Self {
        self.sorts.push(PageSort(key));
        self
    }

    /// The POST body for one page of results.
    pub fn request_body(&self, cursor: Option<&str>, page_size: u32) -> Value {
        let mut body = json!({
            "filter": self.filter.to_json(),
            "page_size": page_size,
        });
        if !self.sorts.is_empty() {
            body["sorts"] = Value::Array(self.sorts.iter().map(PageSort::to_json).collect());
        }
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        body
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn combined_filter_nests_conditions() {
        let filter = PageFilter::And(vec![
            PageFilter::Checked {
                property: "Sync".to_string(),
            },
            PageFilter::EditedAfter(at()),
        ]);

        assert_snapshot!(serde_json::to_string_pretty(&filter.to_json()).unwrap(), @r###"
{
  "and": [
    {
      "checkbox": {
        "equals": true
      },
      "property": "Sync"
    },
    {
      "last_edited_time": {
        "after": "2024-05-01T08:00:00Z"
      },
      "timestamp": "last_edited_time"
    }
  ]
}
"###);
    }

    #[test]
    fn body_carries_cursor_and_sorts_only_when_present() {
        let query = DatabaseQuery::new(PageFilter::DateOnOrAfter {
            property: "Date".to_string(),
            since: at(),
        });

        let first = query.request_body(None, 50);
        assert_eq!(first["page_size"], json!(50));
        assert!(first.get("start_cursor").is_none());
        assert!(first.get("sorts").is_none());

        let next = query
            .sorted_by(SortKey::Property("Date".to_string()))
            .request_body(Some("abc"), 50);
        assert_eq!(next["start_cursor"], json!("abc"));
        assert_eq!(
            next["sorts"],
            json!([{ "property": "Date", "direction": "descending" }])
        );
        assert_eq!(
            next["filter"]["date"]["on_or_after"],
            json!("2024-05-01T08:00:00Z")
        );
    }
}
