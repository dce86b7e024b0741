//! Document search tool.

use serde::Deserialize;

use crate::db::catalog::{self, columns};
use crate::db::{Document, FilterSet, Page, SqliteStore, build_plan};
use crate::mcp::error::ToolResult;
use crate::mcp::protocol::CallToolResult;

use super::page_result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchDocumentsParams {
    pub doc_no: Option<String>,
    pub title: Option<String>,
    pub doc_type: Option<String>,
    pub revision: Option<String>,
    pub project_number: Option<String>,
    #[serde(default)]
    pub include_retired: bool,
    pub limit: Option<u32>,
}

/// Search the document register. Document numbers match by prefix so
/// a discipline code like `RFE-PID` pulls the whole series.
pub async fn search(
    store: &SqliteStore,
    params: SearchDocumentsParams,
) -> ToolResult<CallToolResult> {
    let mut filters = FilterSet::new();
    filters.like_prefix(columns::DOCUMENT_DOC_NO, params.doc_no.as_deref());
    filters.like_contains(columns::DOCUMENT_TITLE, params.title.as_deref());
    filters.equals(columns::DOCUMENT_DOC_TYPE, params.doc_type.as_deref());
    filters.equals(columns::DOCUMENT_REVISION, params.revision.as_deref());
    filters.like_prefix(columns::DOCUMENT_PROJECT_NO, params.project_number.as_deref());

    let plan = build_plan(
        &catalog::DOCUMENT,
        &[],
        &filters,
        params.include_retired,
        params.limit,
    );
    let (rows, total) = store.fetch_page(&plan).await?;
    let items: Vec<Document> = rows.iter().map(Document::from_row).collect();

    page_result(&Page {
        items,
        total,
        limit: plan.limit,
    })
}
