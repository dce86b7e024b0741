//! Asset search and lookup tools.

use serde::Deserialize;
use serde_json::json;

use crate::db::catalog::{self, columns};
use crate::db::{Asset, Document, FilterSet, Page, SqliteStore, build_plan, normalize_tag};

use crate::mcp::error::{ToolError, ToolResult};
use crate::mcp::protocol::CallToolResult;

use super::{json_result, page_result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchAssetsParams {
    pub tag_no: Option<String>,
    pub description: Option<String>,
    pub area: Option<String>,
    pub asset_classes: Option<Vec<String>>,
    pub project_number: Option<String>,
    pub manufacturer: Option<String>,
    pub has_serial_no: Option<bool>,
    #[serde(default)]
    pub include_retired: bool,
    pub limit: Option<u32>,
}

/// Search the asset register. Every filter is optional and absent
/// filters stay out of the query entirely.
pub async fn search(store: &SqliteStore, params: SearchAssetsParams) -> ToolResult<CallToolResult> {
    let mut filters = FilterSet::new();
    filters.like_contains_tag(columns::ASSET_TAG_NO, params.tag_no.as_deref());
    filters.like_contains(columns::ASSET_DESCRIPTION, params.description.as_deref());
    filters.equals(columns::ASSET_AREA, params.area.as_deref());
    filters.in_set(columns::ASSET_CLASS, params.asset_classes.as_deref());
    filters.like_prefix(columns::ASSET_PROJECT_NO, params.project_number.as_deref());
    filters.equals(columns::ASSET_MANUFACTURER, params.manufacturer.as_deref());
    filters.presence(columns::ASSET_SERIAL_NO, params.has_serial_no);

    let plan = build_plan(
        &catalog::ASSET,
        &[],
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

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetAssetParams {
    pub tag_no: String,
}

/// Exact lookup by tag number, retirement status notwithstanding.
/// Linked documents ride along so one call answers "what covers this
/// asset" without a second round trip.
pub async fn get(store: &SqliteStore, params: GetAssetParams) -> ToolResult<CallToolResult> {
    let tag = normalize_tag(&params.tag_no);
    if tag.is_empty() {
        return Err(ToolError::invalid_arguments("tag_no must not be empty"));
    }

    let mut filters = FilterSet::new();
    filters.equals(columns::ASSET_TAG_NO, Some(&tag));
    let plan = build_plan(&catalog::ASSET, &[], &filters, true, Some(1));
    let (rows, _) = store.fetch_page(&plan).await?;

    let Some(row) = rows.first() else {
        return Ok(CallToolResult::failure(format!(
            "No asset found with tag '{}'",
            tag
        )));
    };
    let asset = Asset::from_row(row);

    let mut link_filters = FilterSet::new();
    link_filters.equals(columns::ASSET_TAG_NO, Some(&tag));
    let doc_plan = build_plan(
        &catalog::DOCUMENT,
        &catalog::DOCUMENTS_OF_ASSET,
        &link_filters,
        true,
        None,
    );
    let (doc_rows, doc_total) = store.fetch_page(&doc_plan).await?;
    let documents: Vec<Document> = doc_rows.iter().map(Document::from_row).collect();

    json_result(&json!({
        "asset": asset,
        "documents": {
            "total": doc_total,
            "returned": documents.len(),
            "items": documents,
        },
    }))
}
