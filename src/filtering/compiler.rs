use sea_orm::Condition;

use super::{ConditionBuilder, Criteria, CriteriaBuilder, PredicateBuilder, compile_with};
use crate::config::{CompilerConfig, Representation};
use crate::errors::QueryError;
use crate::models::{FilterClause, PageRequest};
use crate::pagination::PageQuery;
use crate::schema::SchemaProvider;

/// A compiled predicate in the representation chosen by configuration.
#[derive(Debug, Clone)]
pub enum Predicate {
    Condition(Condition),
    Criteria(Criteria),
}

impl Predicate {
    #[must_use]
    pub fn into_condition(self) -> Option<Condition> {
        match self {
            Self::Condition(condition) => Some(condition),
            Self::Criteria(_) => None,
        }
    }

    #[must_use]
    pub fn into_criteria(self) -> Option<Criteria> {
        match self {
            Self::Criteria(criteria) => Some(criteria),
            Self::Condition(_) => None,
        }
    }

    #[must_use]
    pub const fn representation(&self) -> Representation {
        match self {
            Self::Condition(_) => Representation::Condition,
            Self::Criteria(_) => Representation::Criteria,
        }
    }
}

/// Compile `filters` into the given representation.
///
/// # Errors
///
/// Returns a [`QueryError`] for the first clause that does not validate.
pub fn compile<S>(
    entity: &str,
    filters: Option<&[FilterClause]>,
    schema: &S,
    representation: Representation,
) -> Result<Option<Predicate>, QueryError>
where
    S: SchemaProvider + ?Sized,
{
    Ok(match representation {
        Representation::Condition => {
            compile_with(&ConditionBuilder, entity, filters, schema)?.map(Predicate::Condition)
        }
        Representation::Criteria => {
            compile_with(&CriteriaBuilder, entity, filters, schema)?.map(Predicate::Criteria)
        }
    })
}

/// Everything a backend needs to fetch one page.
#[derive(Debug, Clone)]
pub struct QueryPlan<P> {
    /// The normalized request, echoed back in the page result
    pub request: PageRequest,
    pub page: PageQuery,
    /// `None` matches every row
    pub predicate: Option<P>,
}

impl<P> QueryPlan<P> {
    pub fn map_predicate<Q>(self, f: impl FnOnce(P) -> Option<Q>) -> QueryPlan<Q> {
        QueryPlan {
            request: self.request,
            page: self.page,
            predicate: self.predicate.and_then(f),
        }
    }
}

/// Compiles page requests against an injected schema.
///
/// Holds no per-request state, so a single instance can be shared between
/// request handlers.
#[derive(Debug, Clone)]
pub struct QueryCompiler<S> {
    schema: S,
    config: CompilerConfig,
}

impl<S: SchemaProvider> QueryCompiler<S> {
    pub const fn new(schema: S, config: CompilerConfig) -> Self {
        Self { schema, config }
    }

    pub const fn schema(&self) -> &S {
        &self.schema
    }

    pub const fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile filters into the configured representation.
    ///
    /// # Errors
    ///
    /// See [`compile`].
    pub fn compile(
        &self,
        entity: &str,
        filters: Option<&[FilterClause]>,
    ) -> Result<Option<Predicate>, QueryError> {
        compile(entity, filters, &self.schema, self.config.representation)
    }

    /// Compile filters with an explicit builder, ignoring configuration.
    ///
    /// # Errors
    ///
    /// See [`compile_with`].
    pub fn compile_with<B: PredicateBuilder>(
        &self,
        builder: &B,
        entity: &str,
        filters: Option<&[FilterClause]>,
    ) -> Result<Option<B::Predicate>, QueryError> {
        compile_with(builder, entity, filters, &self.schema)
    }

    /// Normalize `request`, resolve the declared type of each sort field and
    /// compile its filters with `builder`.
    ///
    /// # Errors
    ///
    /// [`QueryError::UnknownField`] for an undeclared sort field, or any
    /// filter compilation error.
    pub fn plan_with<B: PredicateBuilder>(
        &self,
        builder: &B,
        entity: &str,
        mut request: PageRequest,
    ) -> Result<QueryPlan<B::Predicate>, QueryError> {
        request.normalize();

        let mut page = PageQuery::from_request(&request);
        for sort in &mut page.order_by {
            let Some(field_type) = self.schema.field_type(entity, &sort.field) else {
                tracing::debug!(entity, field = %sort.field, "Rejected unknown sort field");
                return Err(QueryError::UnknownField {
                    entity: entity.to_string(),
                    field: sort.field.clone(),
                });
            };
            sort.field_type = Some(field_type);
        }

        let predicate = self.compile_with(builder, entity, request.filters.as_deref())?;

        tracing::trace!(
            entity,
            page = page.page_index,
            size = page.page_size,
            filtered = predicate.is_some(),
            "Planned page query"
        );

        Ok(QueryPlan {
            request,
            page,
            predicate,
        })
    }

    /// [`plan_with`](Self::plan_with) using the configured representation.
    ///
    /// # Errors
    ///
    /// See [`plan_with`](Self::plan_with).
    pub fn plan(
        &self,
        entity: &str,
        request: PageRequest,
    ) -> Result<QueryPlan<Predicate>, QueryError> {
        match self.config.representation {
            Representation::Condition => Ok(self
                .plan_with(&ConditionBuilder, entity, request)?
                .map_predicate(|condition| Some(Predicate::Condition(condition)))),
            Representation::Criteria => Ok(self
                .plan_with(&CriteriaBuilder, entity, request)?
                .map_predicate(|criteria| Some(Predicate::Criteria(criteria)))),
        }
    }
}
