//! Table introspection tool.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::{SqliteStore, catalog};
use crate::mcp::error::{ToolError, ToolResult};
use crate::mcp::protocol::CallToolResult;

use super::json_result;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescribeTableParams {
    pub table: String,
}

/// Describe one register table: live column layout from the store,
/// overlaid with which search filter reaches each column, plus the
/// retirement rule and default page size.
///
/// The table name resolves through the catalog allow-list; it is never
/// interpolated into SQL from user input.
pub async fn describe(
    store: &SqliteStore,
    params: DescribeTableParams,
) -> ToolResult<CallToolResult> {
    let Some(entity) = catalog::entity(&params.table) else {
        return Err(ToolError::invalid_arguments(format!(
            "unknown table '{}'; expected one of: {}",
            params.table,
            catalog::entity_names().join(", ")
        )));
    };

    let live = store.table_info(entity.base_table).await?;
    let columns: Vec<Value> = live
        .iter()
        .map(|col| {
            let filter = entity
                .columns
                .iter()
                .find(|def| def.name == col.name)
                .and_then(|def| def.filter);
            json!({
                "name": col.name,
                "type": col.col_type,
                "nullable": !col.notnull,
                "primary_key": col.primary_key,
                "filter": filter,
            })
        })
        .collect();

    let retirement = entity.retirement.as_ref().map(|rule| {
        json!({
            "column": rule.column.rsplit('.').next().unwrap_or(rule.column),
            "marker": rule.marker,
        })
    });

    json_result(&json!({
        "table": entity.name,
        "columns": columns,
        "retirement": retirement,
        "default_limit": entity.default_limit,
    }))
}
