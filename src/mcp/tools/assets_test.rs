//! Tests for the asset tools.

use serde_json::Value;

use crate::db::SqliteStore;
use crate::mcp::error::ToolError;
use crate::mcp::protocol::CallToolResult;
use crate::mcp::tools::assets::{self, GetAssetParams, SearchAssetsParams};

async fn setup_store() -> SqliteStore {
    let store = SqliteStore::in_memory()
        .await
        .expect("Failed to create in-memory store");
    store.migrate().await.expect("Migration should succeed");
    store
}

async fn insert_asset(
    store: &SqliteStore,
    tag_no: &str,
    description: &str,
    area: Option<&str>,
    asset_class: &str,
    status: &str,
) -> i64 {
    sqlx::query(
        "INSERT INTO asset (tag_no, description, area, asset_class, status) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(tag_no)
    .bind(description)
    .bind(area)
    .bind(asset_class)
    .bind(status)
    .execute(store.pool())
    .await
    .expect("asset insert should succeed")
    .last_insert_rowid()
}

async fn insert_document(store: &SqliteStore, doc_no: &str, title: &str, status: &str) -> i64 {
    sqlx::query("INSERT INTO document (doc_no, title, status) VALUES (?, ?, ?)")
        .bind(doc_no)
        .bind(title)
        .bind(status)
        .execute(store.pool())
        .await
        .expect("document insert should succeed")
        .last_insert_rowid()
}

async fn link(store: &SqliteStore, asset_id: i64, document_id: i64) {
    sqlx::query("INSERT INTO asset_document (asset_id, document_id) VALUES (?, ?)")
        .bind(asset_id)
        .bind(document_id)
        .execute(store.pool())
        .await
        .expect("link insert should succeed");
}

fn payload(result: &CallToolResult) -> Value {
    assert!(!result.is_error, "expected a successful result");
    serde_json::from_str(&result.content[0].text).expect("result text should be JSON")
}

#[tokio::test(flavor = "multi_thread")]
async fn search_without_filters_pages_active_assets() {
    let store = setup_store().await;
    insert_asset(&store, "P-101A", "Feed pump", Some("Unit 100"), "PUMP", "ACTIVE").await;
    insert_asset(&store, "P-101B", "Feed pump spare", Some("Unit 100"), "PUMP", "ACTIVE").await;
    insert_asset(&store, "V-201", "Flash vessel", Some("Unit 200"), "VESSEL", "RETIRED").await;

    let result = assets::search(&store, SearchAssetsParams::default())
        .await
        .expect("search should succeed");
    let body = payload(&result);

    assert_eq!(body["total"], 2);
    assert_eq!(body["returned"], 2);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["items"][0]["tag_no"], "P-101A");
    assert_eq!(body["items"][1]["tag_no"], "P-101B");
}

#[tokio::test(flavor = "multi_thread")]
async fn search_combines_filters() {
    let store = setup_store().await;
    insert_asset(&store, "P-101A", "Feed pump", Some("Unit 100"), "PUMP", "ACTIVE").await;
    insert_asset(&store, "P-102A", "Dosing pump", Some("Unit 200"), "PUMP", "ACTIVE").await;
    insert_asset(&store, "K-301", "Air compressor", Some("Unit 100"), "COMPRESSOR", "ACTIVE").await;

    let result = assets::search(
        &store,
        SearchAssetsParams {
            description: Some("pump".to_string()),
            area: Some("Unit 100".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("search should succeed");
    let body = payload(&result);

    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["tag_no"], "P-101A");
}

#[tokio::test(flavor = "multi_thread")]
async fn search_include_retired_widens_the_page() {
    let store = setup_store().await;
    insert_asset(&store, "P-101A", "Feed pump", None, "PUMP", "ACTIVE").await;
    insert_asset(&store, "P-900", "Old transfer pump", None, "PUMP", "RETIRED").await;

    let result = assets::search(
        &store,
        SearchAssetsParams {
            include_retired: true,
            ..Default::default()
        },
    )
    .await
    .expect("search should succeed");
    let body = payload(&result);

    assert_eq!(body["total"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn search_clamps_and_echoes_the_limit() {
    let store = setup_store().await;
    for n in 0..5 {
        insert_asset(&store, &format!("P-{}", n), "Pump", None, "PUMP", "ACTIVE").await;
    }

    let result = assets::search(
        &store,
        SearchAssetsParams {
            limit: Some(0),
            ..Default::default()
        },
    )
    .await
    .expect("search should succeed");
    let body = payload(&result);

    assert_eq!(body["limit"], 1);
    assert_eq!(body["returned"], 1);
    assert_eq!(body["total"], 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_returns_asset_with_linked_documents() {
    let store = setup_store().await;
    let asset_id = insert_asset(&store, "P-101A", "Feed pump", None, "PUMP", "RETIRED").await;
    let current = insert_document(&store, "RFE-PID-0001", "P&ID sheet 1", "ISSUED").await;
    let superseded = insert_document(&store, "RFE-PID-0001-B", "P&ID sheet 1 rev B", "SUPERSEDED").await;
    link(&store, asset_id, current).await;
    link(&store, asset_id, superseded).await;

    let result = assets::get(
        &store,
        GetAssetParams {
            tag_no: "P-101A".to_string(),
        },
    )
    .await
    .expect("lookup should succeed");
    let body = payload(&result);

    // Exact lookup ignores retirement on both sides.
    assert_eq!(body["asset"]["tag_no"], "P-101A");
    assert_eq!(body["asset"]["status"], "RETIRED");
    assert_eq!(body["documents"]["total"], 2);
    assert_eq!(body["documents"]["returned"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_strips_whitespace_from_the_tag() {
    let store = setup_store().await;
    insert_asset(&store, "P-101A", "Feed pump", None, "PUMP", "ACTIVE").await;

    let result = assets::get(
        &store,
        GetAssetParams {
            tag_no: " P-101 A ".to_string(),
        },
    )
    .await
    .expect("lookup should succeed");
    let body = payload(&result);

    assert_eq!(body["asset"]["tag_no"], "P-101A");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_unknown_tag_is_a_tool_failure() {
    let store = setup_store().await;

    let result = assets::get(
        &store,
        GetAssetParams {
            tag_no: "X-999".to_string(),
        },
    )
    .await
    .expect("lookup itself should not error");

    assert!(result.is_error);
    assert!(result.content[0].text.contains("X-999"));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_rejects_a_blank_tag() {
    let store = setup_store().await;

    let err = assets::get(
        &store,
        GetAssetParams {
            tag_no: "   ".to_string(),
        },
    )
    .await
    .expect_err("blank tag should be rejected");

    assert!(matches!(err, ToolError::InvalidArguments { .. }));
}
