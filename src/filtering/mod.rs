//! # Filter Compilation
//!
//! Turns a list of client [`FilterClause`]s into a single predicate for the
//! active storage backend.
//!
//! Compilation happens in two stages:
//!
//! 1. **Resolution** ([`resolve_clause`]): normalize the operator token, look
//!    the field up in the schema, check the operator applies to the field's
//!    type and coerce the raw value. This stage is shared by every backend,
//!    so a clause is accepted or rejected identically whichever one is active.
//! 2. **Building**: a [`PredicateBuilder`] turns each resolved clause into a
//!    backend node and folds the nodes together with AND, in the order the
//!    clauses were supplied.
//!
//! Two builders ship with the crate:
//!
//! - [`ConditionBuilder`] produces a sea-orm [`Condition`](sea_orm::Condition)
//!   for SQL databases
//! - [`CriteriaBuilder`] produces a serializable [`Criteria`] tree that can be
//!   evaluated against JSON documents
//!
//! An empty or missing filter list compiles to `None`, meaning "match all".
//!
//! ```rust,ignore
//! let filters = vec![
//!     FilterClause::new("age", "GET", "18"),
//!     FilterClause::new("name", "like", "ali"),
//! ];
//! let condition = compile_with(&ConditionBuilder, "user", Some(&filters), &schema)?;
//! ```

pub mod compiler;
pub mod condition;
pub mod criteria;

use crate::coercion::{TypedValue, coerce};
use crate::errors::QueryError;
use crate::models::FilterClause;
use crate::operation::Operation;
use crate::schema::{FieldType, SchemaProvider};

pub use compiler::{Predicate, QueryCompiler, QueryPlan, compile};
pub use condition::ConditionBuilder;
pub use criteria::{Criteria, CriteriaBuilder};

/// A filter clause checked against the schema, with its value coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedClause {
    pub field: String,
    pub operation: Operation,
    pub field_type: FieldType,
    pub value: TypedValue,
}

/// Backend-specific construction of predicate nodes.
pub trait PredicateBuilder {
    type Predicate;

    /// Node for a single resolved clause
    fn clause(&self, clause: &ResolvedClause) -> Self::Predicate;

    /// Conjunction of the running predicate and the next clause node
    fn and(&self, lhs: Self::Predicate, rhs: Self::Predicate) -> Self::Predicate;
}

/// Validate one clause against the schema of `entity`.
///
/// # Errors
///
/// - [`QueryError::UnknownField`] if the field is not declared
/// - [`QueryError::UnsupportedOperation`] for a pattern operator on a
///   non-text field
/// - [`QueryError::InvalidValue`] if the value does not parse as the
///   field's type
pub fn resolve_clause<S>(
    entity: &str,
    clause: &FilterClause,
    schema: &S,
) -> Result<ResolvedClause, QueryError>
where
    S: SchemaProvider + ?Sized,
{
    let operation = Operation::normalize(Some(&clause.operator));

    let field_type =
        schema
            .field_type(entity, &clause.field)
            .ok_or_else(|| QueryError::UnknownField {
                entity: entity.to_string(),
                field: clause.field.clone(),
            })?;

    if !field_type.supports(operation) {
        return Err(QueryError::UnsupportedOperation {
            field: clause.field.clone(),
            operation,
            field_type,
        });
    }

    let value = coerce(&clause.value, field_type)
        .map_err(|err| QueryError::invalid_value(&clause.field, err))?;

    Ok(ResolvedClause {
        field: clause.field.clone(),
        operation,
        field_type,
        value,
    })
}

/// Compile `filters` for `entity` with an explicit builder.
///
/// Returns `Ok(None)` when there is nothing to filter on. The first invalid
/// clause rejects the whole set.
///
/// # Errors
///
/// Any error from [`resolve_clause`].
pub fn compile_with<B, S>(
    builder: &B,
    entity: &str,
    filters: Option<&[FilterClause]>,
    schema: &S,
) -> Result<Option<B::Predicate>, QueryError>
where
    B: PredicateBuilder + ?Sized,
    S: SchemaProvider + ?Sized,
{
    let Some(filters) = filters.filter(|filters| !filters.is_empty()) else {
        return Ok(None);
    };

    let mut predicate = None;
    for clause in filters {
        let resolved = resolve_clause(entity, clause, schema).inspect_err(|err| {
            tracing::debug!(entity, field = %clause.field, error = %err, "Rejected filter clause");
        })?;
        let node = builder.clause(&resolved);
        predicate = Some(match predicate {
            Some(acc) => builder.and(acc, node),
            None => node,
        });
    }

    Ok(predicate)
}
