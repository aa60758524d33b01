//! Criteria trees for document stores and in-memory collections.
//!
//! A [`Criteria`] is plain data: it serializes with serde, so it can be
//! handed to a document store adapter, and it can be evaluated directly
//! against `serde_json::Value` documents with [`Criteria::matches`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use super::{PredicateBuilder, ResolvedClause, compiler::QueryPlan};
use crate::coercion::{TypedValue, coerce_json, infer};
use crate::models::PageResult;
use crate::operation::Operation;
use crate::pagination::{SortDirection, SortField};
use crate::schema::FieldType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Criteria {
    /// `field <operation> value`
    Compare {
        field: String,
        operation: Operation,
        value: TypedValue,
    },
    /// Both sides must hold
    And {
        left: Box<Criteria>,
        right: Box<Criteria>,
    },
}

impl Criteria {
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Whether `document` satisfies the tree.
    ///
    /// A missing, `null` or unreadable field never matches, not even `NE`.
    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Self::And { left, right } => left.matches(document) && right.matches(document),
            Self::Compare {
                field,
                operation,
                value,
            } => document
                .get(field)
                .and_then(|stored| coerce_json(stored, value.field_type()))
                .is_some_and(|stored| compare(&stored, *operation, value)),
        }
    }

    /// Number of comparison leaves
    #[must_use]
    pub fn clause_count(&self) -> usize {
        match self {
            Self::Compare { .. } => 1,
            Self::And { left, right } => left.clause_count() + right.clause_count(),
        }
    }
}

fn compare(stored: &TypedValue, operation: Operation, expected: &TypedValue) -> bool {
    if operation.is_pattern() {
        let (TypedValue::String(haystack), TypedValue::String(needle)) = (stored, expected) else {
            return false;
        };
        let haystack = haystack.to_ascii_uppercase();
        let needle = needle.to_ascii_uppercase();
        return match operation {
            Operation::StartsWith => haystack.starts_with(&needle),
            Operation::EndsWith => haystack.ends_with(&needle),
            _ => haystack.contains(&needle),
        };
    }

    let Some(ordering) = stored.compare(expected) else {
        return false;
    };
    match operation {
        Operation::Ne => ordering != Ordering::Equal,
        Operation::Gt => ordering == Ordering::Greater,
        Operation::Get => ordering != Ordering::Less,
        Operation::Lt => ordering == Ordering::Less,
        Operation::Let => ordering != Ordering::Greater,
        _ => ordering == Ordering::Equal,
    }
}

/// Builds [`Criteria`] trees, left-deep in clause order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriteriaBuilder;

impl PredicateBuilder for CriteriaBuilder {
    type Predicate = Criteria;

    fn clause(&self, clause: &ResolvedClause) -> Criteria {
        Criteria::Compare {
            field: clause.field.clone(),
            operation: clause.operation,
            value: clause.value.clone(),
        }
    }

    fn and(&self, lhs: Criteria, rhs: Criteria) -> Criteria {
        lhs.and(rhs)
    }
}

/// Rank of a JSON value kind when sorting untyped fields; missing sorts first
const fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => infer(x)
            .compare(&infer(y))
            .unwrap_or_else(|| x.cmp(y)),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Order two field values by the field's declared type; values that are
/// missing or do not read as that type sort first.
fn compare_typed(a: Option<&Value>, b: Option<&Value>, field_type: FieldType) -> Ordering {
    let typed = |value: Option<&Value>| value.and_then(|value| coerce_json(value, field_type));
    match (typed(a), typed(b)) {
        (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
        (x, y) => x.is_some().cmp(&y.is_some()),
    }
}

fn compare_documents(a: &Value, b: &Value, order_by: &[SortField]) -> Ordering {
    order_by
        .iter()
        .map(|sort| {
            let (a, b) = (a.get(&sort.field), b.get(&sort.field));
            let ordering = match sort.field_type {
                Some(field_type) => compare_typed(a, b, field_type),
                None => compare_values(a, b),
            };
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Execute a criteria plan over in-memory JSON documents.
///
/// Filters, sorts (stable, so unsorted input order breaks ties) and slices
/// `documents`, returning the requested page and its summary.
#[must_use]
pub fn fetch_page(documents: &[Value], plan: &QueryPlan<Criteria>) -> (Vec<Value>, PageResult) {
    let mut matching: Vec<&Value> = documents
        .iter()
        .filter(|document| {
            plan.predicate
                .as_ref()
                .is_none_or(|criteria| criteria.matches(document))
        })
        .collect();

    if !plan.page.order_by.is_empty() {
        matching.sort_by(|a, b| compare_documents(a, b, &plan.page.order_by));
    }

    let total = matching.len() as u64;
    let offset = usize::try_from(plan.page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(plan.page.limit()).unwrap_or(usize::MAX);
    let page = matching
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();

    tracing::trace!(total, page = plan.page.page_index, "Fetched in-memory page");

    (page, PageResult::from_total(total, plan.request.clone()))
}
