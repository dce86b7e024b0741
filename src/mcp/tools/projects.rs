//! Project search tool.

use serde::Deserialize;

use crate::db::catalog::{self, columns};
use crate::db::{FilterSet, Page, Project, SqliteStore, build_plan};
use crate::mcp::error::ToolResult;
use crate::mcp::protocol::CallToolResult;

use super::page_result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchProjectsParams {
    pub project_number: Option<String>,
    pub title: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub include_retired: bool,
    pub limit: Option<u32>,
}

/// Search the project register. Filtering on `status` does not lift
/// the closed-project exclusion, so `status = "CLOSED"` alone returns
/// an empty page; pair it with `include_retired`.
pub async fn search(
    store: &SqliteStore,
    params: SearchProjectsParams,
) -> ToolResult<CallToolResult> {
    let mut filters = FilterSet::new();
    filters.like_prefix(columns::PROJECT_PROJECT_NO, params.project_number.as_deref());
    filters.like_contains(columns::PROJECT_TITLE, params.title.as_deref());
    filters.equals(columns::PROJECT_STATUS, params.status.as_deref());

    let plan = build_plan(
        &catalog::PROJECT,
        &[],
        &filters,
        params.include_retired,
        params.limit,
    );
    let (rows, total) = store.fetch_page(&plan).await?;
    let items: Vec<Project> = rows.iter().map(Project::from_row).collect();

    page_result(&Page {
        items,
        total,
        limit: plan.limit,
    })
}
