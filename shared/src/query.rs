//! Table query description
//!
//! Describes a `select` against one backend table: optional column list,
//! equality filters and an ascending sort field. Backends translate it to
//! their own wire form.

use serde::{Deserialize, Serialize};

/// Equality predicate `field = value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    /// Value in its textual form (`true`, a UUID, `pending`, ...)
    pub value: String,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl ToString) -> Self {
        Self {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Whether a JSON row satisfies this predicate
    pub fn matches(&self, row: &serde_json::Value) -> bool {
        match row.get(&self.field) {
            Some(serde_json::Value::String(s)) => *s == self.value,
            Some(serde_json::Value::Null) | None => false,
            Some(other) => other.to_string() == self.value,
        }
    }
}

/// Select request for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Table name: "rooms", "equipment", "reservations", "profiles"
    pub table: String,
    /// Comma-separated column list (all columns when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Ascending sort field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl TableQuery {
    /// All rows of a table
    pub fn all(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: None,
            filters: Vec::new(),
            order_by: None,
        }
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(field, value));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Column names of the projection, `None` meaning all columns
    pub fn column_list(&self) -> Option<Vec<&str>> {
        self.columns
            .as_deref()
            .filter(|c| c.trim() != "*")
            .map(|c| c.split(',').map(str::trim).filter(|c| !c.is_empty()).collect())
    }
}
