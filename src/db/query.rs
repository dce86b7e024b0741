//! Paired query builder.
//!
//! Renders a [`FilterSet`] against a catalog entity into a result
//! query and a count query that share one WHERE clause and one
//! parameter list. Placeholders are named `@p1..@pN` by position;
//! SQLite assigns parameter indices by first occurrence, so binding
//! `params` in order lines the two up.

use super::catalog::{EntityDef, Join};
use super::filter::{FilterSet, Predicate};

/// Hard ceiling on any result page.
pub const MAX_LIMIT: u32 = 500;

/// A renderable query pair. `params` values bind to `@p1..@pN` in
/// order, identically in both queries; `limit` appears only in
/// `query`, already validated and clamped.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub query: String,
    pub count_query: String,
    pub params: Vec<String>,
    pub limit: u32,
}

/// Clamp a requested page size into `1..=MAX_LIMIT`, falling back to
/// the entity default when the caller gave none.
pub fn effective_limit(default_limit: u32, requested: Option<u32>) -> u32 {
    requested.unwrap_or(default_limit).clamp(1, MAX_LIMIT)
}

/// Build the result/count pair for one entity search.
///
/// Predicates render in insertion order; the retirement exclusion, if
/// active, is appended last as an inlined literal from the catalog so
/// it never shifts parameter numbering. Joins switch the projection to
/// DISTINCT and the count to `COUNT(DISTINCT key)` so link-table fans
/// cannot inflate either side.
pub fn build_plan(
    entity: &EntityDef,
    joins: &[Join],
    filters: &FilterSet,
    include_retired: bool,
    requested_limit: Option<u32>,
) -> QueryPlan {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    for spec in filters.entries() {
        conditions.push(render_predicate(spec.column, &spec.predicate, &mut params));
    }

    if !include_retired {
        if let Some(retirement) = &entity.retirement {
            conditions.push(format!("{} <> '{}'", retirement.column, retirement.marker));
        }
    }

    let mut from = String::from(entity.table);
    for join in joins {
        from.push_str(&format!(" JOIN {} ON {}", join.table, join.on));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let (projection, count_expr) = if joins.is_empty() {
        (entity.select_list.to_string(), "COUNT(*)".to_string())
    } else {
        (
            format!("DISTINCT {}", entity.select_list),
            format!("COUNT(DISTINCT {})", entity.key),
        )
    };

    let limit = effective_limit(entity.default_limit, requested_limit);

    let query = format!(
        "SELECT {} FROM {}{} ORDER BY {} LIMIT {}",
        projection, from, where_clause, entity.order_by, limit
    );
    let count_query = format!("SELECT {} FROM {}{}", count_expr, from, where_clause);

    QueryPlan {
        query,
        count_query,
        params,
        limit,
    }
}

fn render_predicate(column: &str, predicate: &Predicate, params: &mut Vec<String>) -> String {
    match predicate {
        Predicate::Equals(value) => {
            params.push(value.clone());
            format!("{} = @p{}", column, params.len())
        }
        Predicate::LikeContains(pattern) | Predicate::LikePrefix(pattern) => {
            params.push(pattern.clone());
            format!("{} LIKE @p{} ESCAPE '\\'", column, params.len())
        }
        Predicate::InSet(values) => {
            let mut placeholders = Vec::with_capacity(values.len());
            for value in values {
                params.push(value.clone());
                placeholders.push(format!("@p{}", params.len()));
            }
            format!("{} IN ({})", column, placeholders.join(", "))
        }
        Predicate::IsNull => format!("{} IS NULL", column),
        Predicate::IsNotNull => format!("{} IS NOT NULL", column),
    }
}
