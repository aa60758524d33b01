//! Running a compiled [`QueryPlan`] through sea-orm.
//!
//! The plan's field names are used as column names.
//!
//! ```rust,ignore
//! let plan = compiler.plan_with(&ConditionBuilder, "user", request)?;
//! let (users, page) = fetch_page(&db, user::Entity::find(), &plan).await?;
//! ```

use sea_orm::{
    Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
    sea_query::{Alias, Expr, SimpleExpr},
};

use crate::filtering::QueryPlan;
use crate::models::PageResult;

fn filtered_and_ordered<E: EntityTrait>(
    mut select: Select<E>,
    plan: &QueryPlan<Condition>,
) -> Select<E> {
    if let Some(condition) = &plan.predicate {
        select = select.filter(condition.clone());
    }

    for sort in &plan.page.order_by {
        let column: SimpleExpr = Expr::col(Alias::new(sort.field.as_str())).into();
        select = select.order_by(column, sort.direction.into());
    }

    select
}

/// Apply filter, ordering, offset and limit of `plan` to `select`.
#[must_use]
pub fn apply_plan<E: EntityTrait>(select: Select<E>, plan: &QueryPlan<Condition>) -> Select<E> {
    filtered_and_ordered(select, plan)
        .offset(plan.page.offset())
        .limit(plan.page.limit())
}

/// Fetch the planned page and summarize it.
///
/// Rows are fetched with the plan's saturating offset, so any page index is
/// safe; a page past the end is empty.
///
/// # Errors
///
/// Returns any `DbErr` raised while counting or fetching.
pub async fn fetch_page<'db, E, C>(
    db: &'db C,
    select: Select<E>,
    plan: &QueryPlan<Condition>,
) -> Result<(Vec<E::Model>, PageResult), DbErr>
where
    E: EntityTrait,
    E::Model: Sync + 'db,
    C: ConnectionTrait,
{
    let totals = filtered_and_ordered(select.clone(), plan)
        .paginate(db, plan.page.page_size)
        .num_items_and_pages()
        .await?;
    let models = apply_plan(select, plan).all(db).await?;

    tracing::debug!(
        items = totals.number_of_items,
        pages = totals.number_of_pages,
        page = plan.page.page_index,
        "Fetched page"
    );

    Ok((
        models,
        PageResult::summarize(
            totals.number_of_pages,
            totals.number_of_items,
            plan.request.clone(),
        ),
    ))
}
