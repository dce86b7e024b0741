//! Link traversal tools over the asset/document join table.

use serde::Deserialize;

use crate::db::catalog::{self, columns};
use crate::db::{Asset, Document, FilterSet, Page, SqliteStore, build_plan, normalize_tag};
use crate::mcp::error::{ToolError, ToolResult};
use crate::mcp::protocol::CallToolResult;

use super::page_result;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetDocumentsParams {
    pub tag_no: String,
    pub doc_type: Option<String>,
    #[serde(default)]
    pub include_retired: bool,
    pub limit: Option<u32>,
}

/// Documents linked to one asset, in document-number order. The
/// retirement rule applies to the document side: superseded revisions
/// stay hidden unless `include_retired` is set.
pub async fn asset_documents(
    store: &SqliteStore,
    params: AssetDocumentsParams,
) -> ToolResult<CallToolResult> {
    let tag = normalize_tag(&params.tag_no);
    if tag.is_empty() {
        return Err(ToolError::invalid_arguments("tag_no must not be empty"));
    }

    let mut filters = FilterSet::new();
    filters.equals(columns::ASSET_TAG_NO, Some(&tag));
    filters.equals(columns::DOCUMENT_DOC_TYPE, params.doc_type.as_deref());

    let plan = build_plan(
        &catalog::DOCUMENT,
        &catalog::DOCUMENTS_OF_ASSET,
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

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentAssetsParams {
    pub doc_no: String,
    pub area: Option<String>,
    #[serde(default)]
    pub include_retired: bool,
    pub limit: Option<u32>,
}

/// Assets covered by one document. The retirement rule applies to the
/// asset side here.
pub async fn document_assets(
    store: &SqliteStore,
    params: DocumentAssetsParams,
) -> ToolResult<CallToolResult> {
    let doc_no = params.doc_no.trim();
    if doc_no.is_empty() {
        return Err(ToolError::invalid_arguments("doc_no must not be empty"));
    }

    let mut filters = FilterSet::new();
    filters.equals(columns::DOCUMENT_DOC_NO, Some(doc_no));
    filters.equals(columns::ASSET_AREA, params.area.as_deref());

    let plan = build_plan(
        &catalog::ASSET,
        &catalog::ASSETS_OF_DOCUMENT,
        &filters,
        params.include_retired,
        params.limit,
    );
    let (rows, total) = store.fetch_page(&plan).await?;
    let items: Vec<Asset> = rows.iter().map(Asset::from_row).collect();

    page_result(&Page {
        items,
        total,
        limit: plan.limit,
    })
}
