//! Select Query Builder
//!
//! A small builder for read queries against the hosted backend, mirroring
//! the REST dialect the backend speaks: one table per query, column
//! projection, conjunctive filters with an optional `or` group, ordering
//! and a row limit.
//!
//! The same structure drives both transports: the REST client renders it
//! to query-string pairs, the in-memory fake evaluates it against rows.

use serde_json::Value;

use super::row::Row;

/// A read query against a single table
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Table to read from
    pub table: String,
    /// Column projection (`*` selects everything)
    pub columns: String,
    /// Filters, combined with AND
    pub filters: Vec<Filter>,
    /// Optional ordering
    pub order: Option<Order>,
    /// Optional row limit
    pub limit: Option<usize>,
}

impl SelectQuery {
    /// Start a query on the given table, selecting all columns
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restrict the column projection
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    /// Add a filter (AND-combined with the others)
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the ordering
    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Cap the number of returned rows
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Render to query-string pairs in the backend's REST dialect.
    /// Values are raw; the transport percent-encodes them.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        for filter in &self.filters {
            pairs.push(filter.to_query_pair());
        }
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.to_expr()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Evaluate the query against in-memory rows: filter, sort, truncate.
    /// Column projection is ignored; the fake always returns whole rows.
    pub fn apply_to(&self, rows: &[Row]) -> Vec<Row> {
        let mut matched: Vec<Row> = rows
            .iter()
            .filter(|row| self.filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect();

        if let Some(order) = &self.order {
            matched.sort_by(|a, b| {
                let cmp = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    cmp
                } else {
                    cmp.reverse()
                }
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column equals value
    Eq(String, String),
    /// Case-insensitive "contains" on a text column
    Ilike(String, String),
    /// Column is one of the listed values
    In(String, Vec<String>),
    /// Any of the nested filters matches
    Or(Vec<Filter>),
}

impl Filter {
    /// Equality filter; the value is rendered with `ToString`, so ids and
    /// enums can be passed directly
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self::Eq(column.into(), value.to_string())
    }

    /// Case-insensitive contains filter for search boxes
    pub fn ilike(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Ilike(column.into(), needle.into())
    }

    /// Membership filter
    pub fn is_in(column: impl Into<String>, values: Vec<String>) -> Self {
        Self::In(column.into(), values)
    }

    /// Disjunction of filters, used for multi-column searches
    pub fn any(filters: Vec<Filter>) -> Self {
        Self::Or(filters)
    }

    /// Render as a (key, value) query pair
    pub fn to_query_pair(&self) -> (String, String) {
        match self {
            Self::Or(filters) => {
                let inner: Vec<String> = filters.iter().map(Filter::to_expr).collect();
                ("or".to_string(), format!("({})", inner.join(",")))
            }
            Self::Eq(column, _) | Self::Ilike(column, _) | Self::In(column, _) => {
                (column.clone(), self.op_expr())
            }
        }
    }

    /// Render as `column.op.value`, the form used inside `or=(...)` groups
    fn to_expr(&self) -> String {
        match self {
            Self::Or(filters) => {
                let inner: Vec<String> = filters.iter().map(Filter::to_expr).collect();
                format!("or({})", inner.join(","))
            }
            Self::Eq(column, _) | Self::Ilike(column, _) | Self::In(column, _) => {
                format!("{}.{}", column, self.op_expr())
            }
        }
    }

    /// The `op.value` part of the rendered filter
    fn op_expr(&self) -> String {
        match self {
            Self::Eq(_, value) => format!("eq.{value}"),
            // `*` is the REST dialect's wildcard
            Self::Ilike(_, needle) => format!("ilike.*{needle}*"),
            Self::In(_, values) => format!("in.({})", values.join(",")),
            Self::Or(_) => String::new(),
        }
    }

    /// Evaluate against a single row
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Self::Eq(column, value) => row
                .get(column)
                .map(|v| value_eq(v, value))
                .unwrap_or(false),
            Self::Ilike(column, needle) => row
                .get(column)
                .and_then(Value::as_str)
                .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Self::In(column, values) => row
                .get(column)
                .map(|v| values.iter().any(|candidate| value_eq(v, candidate)))
                .unwrap_or(false),
            Self::Or(filters) => filters.iter().any(|f| f.matches(row)),
        }
    }
}

/// Sort direction plus column
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    /// Ascending order on a column
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Descending order on a column
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }

    fn to_expr(&self) -> String {
        let dir = if self.ascending { "asc" } else { "desc" };
        format!("{}.{}", self.column, dir)
    }
}

/// Compare a JSON value against a filter's string form. Strings compare
/// directly; numbers, bools and uuids compare via their canonical text.
fn value_eq(value: &Value, filter_value: &str) -> bool {
    match value {
        Value::String(s) => s == filter_value,
        Value::Null => false,
        other => other.to_string() == filter_value,
    }
}

/// Total order over JSON values for in-memory sorting. Timestamps are ISO
/// strings, so lexicographic order is chronological order.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => text_of(x).cmp(&text_of(y)),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    #[test]
    fn test_query_builder_basic() {
        let query = SelectQuery::from("organizations")
            .filter(Filter::eq("status", "active"))
            .order(Order::desc("created_at"))
            .limit(50);

        assert_eq!(query.table, "organizations");
        assert_eq!(query.columns, "*");
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.limit, Some(50));
    }

    #[test]
    fn test_query_pairs_rendering() {
        let query = SelectQuery::from("users")
            .columns("id,full_name,email")
            .filter(Filter::eq("org_id", "abc"))
            .filter(Filter::ilike("full_name", "rao"))
            .order(Order::asc("full_name"))
            .limit(20);

        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "id,full_name,email".to_string()),
                ("org_id".to_string(), "eq.abc".to_string()),
                ("full_name".to_string(), "ilike.*rao*".to_string()),
                ("order".to_string(), "full_name.asc".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_or_group_rendering() {
        let filter = Filter::any(vec![
            Filter::ilike("full_name", "dev"),
            Filter::ilike("email", "dev"),
        ]);
        assert_eq!(
            filter.to_query_pair(),
            (
                "or".to_string(),
                "(full_name.ilike.*dev*,email.ilike.*dev*)".to_string()
            )
        );
    }

    #[test]
    fn test_eq_matches_non_string_values() {
        let r = row(json!({"attempts": 3, "active": true}));
        assert!(Filter::eq("attempts", 3).matches(&r));
        assert!(Filter::eq("active", true).matches(&r));
        assert!(!Filter::eq("attempts", 4).matches(&r));
        assert!(!Filter::eq("missing", 1).matches(&r));
    }

    #[test]
    fn test_ilike_is_case_insensitive_contains() {
        let r = row(json!({"full_name": "Meera Raghavan"}));
        assert!(Filter::ilike("full_name", "raghav").matches(&r));
        assert!(Filter::ilike("full_name", "MEERA").matches(&r));
        assert!(!Filter::ilike("full_name", "patel").matches(&r));
    }

    #[test]
    fn test_or_matches_any_branch() {
        let filter = Filter::any(vec![
            Filter::ilike("full_name", "zz"),
            Filter::ilike("email", "school.test"),
        ]);
        let r = row(json!({"full_name": "Anil", "email": "anil@school.test"}));
        assert!(filter.matches(&r));
    }

    #[test]
    fn test_apply_to_filters_sorts_and_limits() {
        let rows = vec![
            row(json!({"id": "1", "status": "active", "created_at": "2026-01-03T00:00:00Z"})),
            row(json!({"id": "2", "status": "suspended", "created_at": "2026-01-02T00:00:00Z"})),
            row(json!({"id": "3", "status": "active", "created_at": "2026-01-05T00:00:00Z"})),
            row(json!({"id": "4", "status": "active", "created_at": "2026-01-01T00:00:00Z"})),
        ];

        let query = SelectQuery::from("organizations")
            .filter(Filter::eq("status", "active"))
            .order(Order::desc("created_at"))
            .limit(2);

        let result = query.apply_to(&rows);
        let ids: Vec<_> = result
            .iter()
            .map(|r| r.get("id").and_then(Value::as_str).unwrap_or(""))
            .collect();
        assert_eq!(ids, vec!["3", "1"]);
    }
}
