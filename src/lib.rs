//! # pagequery
//!
//! Compiles client filter, sort and page requests into backend predicates,
//! and backend page metadata back into client page summaries.
//!
//! ```rust,ignore
//! use pagequery::{CompilerConfig, EntitySchema, FieldType, PageRequest, QueryCompiler};
//!
//! let compiler = QueryCompiler::new(
//!     EntitySchema::new("user")
//!         .field("name", FieldType::String)
//!         .field("created_at", FieldType::DateTime),
//!     CompilerConfig::default(),
//! );
//!
//! let request: PageRequest = serde_json::from_str(body)?;
//! let plan = compiler.plan_with(&ConditionBuilder, "user", request)?;
//! let (users, page) = pagequery::execution::fetch_page(&db, user::Entity::find(), &plan).await?;
//! ```

pub mod coercion;
pub mod config;
pub mod errors;
pub mod execution;
pub mod filtering;
pub mod models;
pub mod operation;
pub mod pagination;
pub mod schema;

pub use coercion::{TypedValue, coerce, infer};
pub use config::{CompilerConfig, Representation};
pub use errors::{CoercionError, QueryError};
pub use filtering::{
    ConditionBuilder, Criteria, CriteriaBuilder, Predicate, PredicateBuilder, QueryCompiler,
    QueryPlan, compile, compile_with,
};
pub use models::{FilterClause, PageRequest, PageResult};
pub use operation::Operation;
pub use pagination::{PageQuery, SortDirection, SortField, normalize, summarize};
pub use schema::{EntitySchema, FieldType, SchemaProvider, SchemaRegistry};
