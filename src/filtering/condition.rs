use sea_orm::{
    Condition, Value,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};

use super::{PredicateBuilder, ResolvedClause};
use crate::coercion::TypedValue;
use crate::operation::Operation;

const LIKE_ESCAPE: char = '\\';

impl From<TypedValue> for Value {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::String(s) => Self::String(Some(Box::new(s))),
            TypedValue::Number(n) => Self::Double(Some(n)),
            TypedValue::Date(d) => Self::ChronoDate(Some(Box::new(d))),
            TypedValue::DateTime(dt) => Self::ChronoDateTimeUtc(Some(Box::new(dt))),
        }
    }
}

/// Escape LIKE wildcards so the client value matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// Case-insensitive pattern match, as `UPPER(col) LIKE UPPER(pattern)`.
/// Only ASCII letters are folded on the pattern side.
fn build_pattern_condition(field: &str, operation: Operation, value: &str) -> SimpleExpr {
    let needle = escape_like(&value.to_ascii_uppercase());
    let pattern = match operation {
        Operation::StartsWith => format!("{needle}%"),
        Operation::EndsWith => format!("%{needle}"),
        _ => format!("%{needle}%"),
    };

    SimpleExpr::FunctionCall(Func::upper(Expr::col(Alias::new(field))))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Build the SQL expression for a single resolved clause.
#[must_use]
pub fn build_clause_expr(clause: &ResolvedClause) -> SimpleExpr {
    if clause.operation.is_pattern() {
        return build_pattern_condition(
            &clause.field,
            clause.operation,
            &clause.value.to_string(),
        );
    }

    let column = Expr::col(Alias::new(clause.field.as_str()));
    let value = Value::from(clause.value.clone());
    match clause.operation {
        Operation::Ne => column.ne(value),
        Operation::Gt => column.gt(value),
        Operation::Get => column.gte(value),
        Operation::Lt => column.lt(value),
        Operation::Let => column.lte(value),
        _ => column.eq(value),
    }
}

/// Builds sea-orm [`Condition`] trees for SQL backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionBuilder;

impl PredicateBuilder for ConditionBuilder {
    type Predicate = Condition;

    fn clause(&self, clause: &ResolvedClause) -> Condition {
        Condition::all().add(build_clause_expr(clause))
    }

    fn and(&self, lhs: Condition, rhs: Condition) -> Condition {
        lhs.add(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::compile_with;
    use crate::models::FilterClause;
    use crate::schema::{EntitySchema, FieldType};
    use sea_orm::sea_query::{Asterisk, Query, SqliteQueryBuilder};

    fn schema() -> EntitySchema {
        EntitySchema::new("user")
            .field("name", FieldType::String)
            .field("age", FieldType::Number)
            .field("birthday", FieldType::Date)
            .field("created_at", FieldType::DateTime)
    }

    fn to_sql(filters: &[FilterClause]) -> String {
        let condition = compile_with(&ConditionBuilder, "user", Some(filters), &schema())
            .unwrap()
            .unwrap();
        Query::select()
            .column(Asterisk)
            .from(Alias::new("users"))
            .cond_where(condition)
            .to_string(SqliteQueryBuilder)
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_comparison_operators() {
        let cases = [
            ("EQ", "\"age\" = "),
            ("NE", "\"age\" <> "),
            ("GT", "\"age\" > "),
            ("GET", "\"age\" >= "),
            ("LT", "\"age\" < "),
            ("LET", "\"age\" <= "),
        ];
        for (operation, expected) in cases {
            let sql = to_sql(&[FilterClause::new("age", operation, "30")]);
            assert!(sql.contains(expected), "{operation}: {sql}");
        }
    }

    #[test]
    fn test_unknown_operator_compiles_as_eq() {
        let sql = to_sql(&[FilterClause::new("age", "OO", "30")]);
        assert!(sql.contains("\"age\" = "), "{sql}");
    }

    #[test]
    fn test_pattern_operators() {
        let sql = to_sql(&[FilterClause::new("name", "like", "Ali")]);
        assert!(sql.contains("UPPER(\"name\") LIKE '%ALI%'"), "{sql}");

        let sql = to_sql(&[FilterClause::new("name", "STARTSWITH", "Ali")]);
        assert!(sql.contains("LIKE 'ALI%'"), "{sql}");

        let sql = to_sql(&[FilterClause::new("name", "endsWith", "ce")]);
        assert!(sql.contains("LIKE '%CE'"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn test_pattern_folds_ascii_only() {
        let sql = to_sql(&[FilterClause::new("name", "LIKE", "émile")]);
        assert!(sql.contains("LIKE '%éMILE%'"), "{sql}");
    }

    #[test]
    fn test_datetime_not_equal() {
        let sql = to_sql(&[FilterClause::new("created_at", "nE", "2002-04-20T12:30:52Z")]);
        assert!(sql.contains("\"created_at\" <> "), "{sql}");
        assert!(sql.contains("2002-04-20 12:30:52"), "{sql}");
    }

    #[test]
    fn test_date_comparison() {
        let sql = to_sql(&[FilterClause::new("birthday", "LT", "1990-01-31")]);
        assert!(sql.contains("\"birthday\" < '1990-01-31'"), "{sql}");
    }

    #[test]
    fn test_clauses_joined_with_and_in_order() {
        let sql = to_sql(&[
            FilterClause::new("age", "GT", "18"),
            FilterClause::new("name", "EQ", "bob"),
        ]);
        let age = sql.find("\"age\" >").unwrap();
        let and = sql.find(" AND ").unwrap();
        let name = sql.find("\"name\" = 'bob'").unwrap();
        assert!(age < and && and < name, "{sql}");
    }
}
