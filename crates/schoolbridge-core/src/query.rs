// WHERE clause types for the adapter contract.
//
// The external auth library filters with sequences of `{field, value}`
// equality clauses. An operator slot exists in the wire shape but nothing in
// this design dispatches on anything except equality, so strategy selection
// only considers `Eq` clauses.

use serde::{Deserialize, Serialize};

/// Comparison operators the wire shape admits. Only `Eq` is dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[default]
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
}

/// A single WHERE condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhereClause {
    /// The field name to filter on (camelCase, as the auth library sends it).
    pub field: String,
    /// The comparison value.
    pub value: serde_json::Value,
    /// The comparison operator (default: Eq).
    #[serde(default)]
    pub operator: Operator,
}

impl WhereClause {
    /// Simple equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator: Operator::Eq,
        }
    }
}

/// Find the string value of an equality clause on `field`, if present.
///
/// Non-equality clauses and non-string values never participate in lookup
/// dispatch, so they are skipped here.
pub fn eq_str<'a>(clauses: &'a [WhereClause], field: &str) -> Option<&'a str> {
    clauses
        .iter()
        .find(|c| c.operator == Operator::Eq && c.field == field)
        .and_then(|c| c.value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_str_finds_equality_clause() {
        let clauses = vec![
            WhereClause::eq("userId", "u1"),
            WhereClause::eq("token", "t1"),
        ];
        assert_eq!(eq_str(&clauses, "token"), Some("t1"));
        assert_eq!(eq_str(&clauses, "id"), None);
    }

    #[test]
    fn test_eq_str_skips_non_equality() {
        let clauses = vec![WhereClause {
            field: "expiresAt".into(),
            value: serde_json::json!("2030-01-01"),
            operator: Operator::Lt,
        }];
        assert_eq!(eq_str(&clauses, "expiresAt"), None);
    }

    #[test]
    fn test_eq_str_skips_non_string_values() {
        let clauses = vec![WhereClause::eq("id", 42)];
        assert_eq!(eq_str(&clauses, "id"), None);
    }
}
