//! Tests for the SQLite store.

use crate::db::catalog::{self, columns};
use crate::db::filter::FilterSet;
use crate::db::models::{Asset, Document};
use crate::db::query::build_plan;
use crate::db::sqlite::{DEFAULT_QUERY_TIMEOUT, SqliteStore};

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
    serial_no: Option<&str>,
    status: &str,
) -> i64 {
    sqlx::query(
        "INSERT INTO asset (tag_no, description, area, asset_class, serial_no, status) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(tag_no)
    .bind(description)
    .bind(area)
    .bind(asset_class)
    .bind(serial_no)
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

#[tokio::test(flavor = "multi_thread")]
async fn migrate_creates_register_tables() {
    let store = setup_store().await;

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(store.pool())
            .await
            .expect("Query should succeed");

    for table in ["_sqlx_migrations", "asset", "asset_document", "document", "project"] {
        assert!(
            tables.iter().any(|t| t == table),
            "Missing table: {}. Found tables: {:?}",
            table,
            tables
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn probe_succeeds_on_open_store() {
    let store = setup_store().await;
    store.probe().await.expect("probe should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_page_returns_rows_and_unpaged_total() {
    let store = setup_store().await;
    for n in 1..=5 {
        insert_asset(
            &store,
            &format!("P-10{}", n),
            "centrifugal pump",
            Some("Unit 300"),
            "PUMP",
            None,
            "ACTIVE",
        )
        .await;
    }

    let plan = build_plan(&catalog::ASSET, &[], &FilterSet::new(), false, Some(2));
    let (rows, total) = store.fetch_page(&plan).await.expect("fetch should succeed");

    assert_eq!(rows.len(), 2);
    assert_eq!(total, 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn results_are_ordered_by_the_entity_key() {
    let store = setup_store().await;
    for tag in ["P-300", "P-100", "P-200"] {
        insert_asset(&store, tag, "pump", None, "PUMP", None, "ACTIVE").await;
    }

    let plan = build_plan(&catalog::ASSET, &[], &FilterSet::new(), false, None);
    let (rows, _) = store.fetch_page(&plan).await.expect("fetch should succeed");

    let tags: Vec<String> = rows.iter().map(|r| Asset::from_row(r).tag_no).collect();
    assert_eq!(tags, vec!["P-100", "P-200", "P-300"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn equality_filter_applies_to_rows_and_count() {
    let store = setup_store().await;
    insert_asset(&store, "P-101", "pump", Some("Unit 300"), "PUMP", None, "ACTIVE").await;
    insert_asset(&store, "P-102", "pump", Some("Unit 400"), "PUMP", None, "ACTIVE").await;

    let mut filters = FilterSet::new();
    filters.equals(columns::ASSET_AREA, Some("Unit 300"));
    let plan = build_plan(&catalog::ASSET, &[], &filters, false, None);
    let (rows, total) = store.fetch_page(&plan).await.expect("fetch should succeed");

    assert_eq!(rows.len(), 1);
    assert_eq!(total, 1);
    let asset = Asset::from_row(&rows[0]);
    assert_eq!(asset.tag_no, "P-101");
    assert_eq!(asset.area.as_deref(), Some("Unit 300"));
}

#[tokio::test(flavor = "multi_thread")]
async fn like_escape_matches_metacharacters_literally() {
    let store = setup_store().await;
    insert_asset(&store, "P-101", "spare at 100% capacity", None, "PUMP", None, "ACTIVE").await;
    insert_asset(&store, "P-102", "spare at 100 capacity", None, "PUMP", None, "ACTIVE").await;

    let mut filters = FilterSet::new();
    filters.like_contains(columns::ASSET_DESCRIPTION, Some("100%"));
    let plan = build_plan(&catalog::ASSET, &[], &filters, false, None);
    let (rows, total) = store.fetch_page(&plan).await.expect("fetch should succeed");

    assert_eq!(total, 1);
    assert_eq!(Asset::from_row(&rows[0]).tag_no, "P-101");
}

#[tokio::test(flavor = "multi_thread")]
async fn set_membership_matches_any_element() {
    let store = setup_store().await;
    insert_asset(&store, "P-101", "pump", None, "PUMP", None, "ACTIVE").await;
    insert_asset(&store, "V-201", "valve", None, "VALVE", None, "ACTIVE").await;
    insert_asset(&store, "M-301", "motor", None, "MOTOR", None, "ACTIVE").await;

    let mut filters = FilterSet::new();
    let classes = vec!["PUMP".to_string(), "VALVE".to_string()];
    filters.in_set(columns::ASSET_CLASS, Some(&classes));
    let plan = build_plan(&catalog::ASSET, &[], &filters, false, None);
    let (rows, total) = store.fetch_page(&plan).await.expect("fetch should succeed");

    assert_eq!(rows.len(), 2);
    assert_eq!(total, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn retired_rows_hidden_unless_asked() {
    let store = setup_store().await;
    insert_asset(&store, "P-101", "pump", None, "PUMP", None, "ACTIVE").await;
    insert_asset(&store, "P-102", "pump, removed 2019", None, "PUMP", None, "RETIRED").await;

    let hidden = build_plan(&catalog::ASSET, &[], &FilterSet::new(), false, None);
    let (_, total_hidden) = store.fetch_page(&hidden).await.expect("fetch should succeed");
    assert_eq!(total_hidden, 1);

    let shown = build_plan(&catalog::ASSET, &[], &FilterSet::new(), true, None);
    let (_, total_shown) = store.fetch_page(&shown).await.expect("fetch should succeed");
    assert_eq!(total_shown, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn presence_probe_filters_on_null_serials() {
    let store = setup_store().await;
    insert_asset(&store, "P-101", "pump", None, "PUMP", Some("SN-778"), "ACTIVE").await;
    insert_asset(&store, "P-102", "pump", None, "PUMP", None, "ACTIVE").await;

    let mut filters = FilterSet::new();
    filters.presence(columns::ASSET_SERIAL_NO, Some(true));
    let plan = build_plan(&catalog::ASSET, &[], &filters, false, None);
    let (rows, total) = store.fetch_page(&plan).await.expect("fetch should succeed");

    assert_eq!(total, 1);
    assert_eq!(Asset::from_row(&rows[0]).serial_no.as_deref(), Some("SN-778"));
}

#[tokio::test(flavor = "multi_thread")]
async fn join_results_deduplicate_the_projected_entity() {
    let store = setup_store().await;
    let a1 = insert_asset(&store, "P-101A", "pump", None, "PUMP", None, "ACTIVE").await;
    let a2 = insert_asset(&store, "P-101B", "pump", None, "PUMP", None, "ACTIVE").await;
    let doc = insert_document(&store, "VDS-0101", "Pump data sheet", "ISSUED").await;
    link(&store, a1, doc).await;
    link(&store, a2, doc).await;

    let plan = build_plan(
        &catalog::DOCUMENT,
        &catalog::DOCUMENTS_OF_ASSET,
        &FilterSet::new(),
        false,
        None,
    );
    let (rows, total) = store.fetch_page(&plan).await.expect("fetch should succeed");

    assert_eq!(rows.len(), 1, "the same document must not repeat per link");
    assert_eq!(total, 1);
    assert_eq!(Document::from_row(&rows[0]).doc_no, "VDS-0101");
}

#[tokio::test(flavor = "multi_thread")]
async fn join_filter_narrows_to_one_side() {
    let store = setup_store().await;
    let a1 = insert_asset(&store, "P-101A", "pump", None, "PUMP", None, "ACTIVE").await;
    let a2 = insert_asset(&store, "P-101B", "pump", None, "PUMP", None, "ACTIVE").await;
    let d1 = insert_document(&store, "VDS-0101", "Pump data sheet", "ISSUED").await;
    let d2 = insert_document(&store, "VDS-0102", "Seal plan", "ISSUED").await;
    link(&store, a1, d1).await;
    link(&store, a2, d2).await;

    let mut filters = FilterSet::new();
    filters.equals(columns::ASSET_TAG_NO, Some("P-101A"));
    let plan = build_plan(
        &catalog::DOCUMENT,
        &catalog::DOCUMENTS_OF_ASSET,
        &filters,
        false,
        None,
    );
    let (rows, total) = store.fetch_page(&plan).await.expect("fetch should succeed");

    assert_eq!(total, 1);
    assert_eq!(Document::from_row(&rows[0]).doc_no, "VDS-0101");
}

#[tokio::test(flavor = "multi_thread")]
async fn table_info_reports_live_columns() {
    let store = setup_store().await;

    let info = store
        .table_info(catalog::ASSET.base_table)
        .await
        .expect("table_info should succeed");

    let tag = info
        .iter()
        .find(|c| c.name == "tag_no")
        .expect("tag_no column should exist");
    assert!(tag.notnull);
    assert!(!tag.primary_key);

    let serial = info
        .iter()
        .find(|c| c.name == "serial_no")
        .expect("serial_no column should exist");
    assert!(!serial.notnull);

    let id = info
        .iter()
        .find(|c| c.name == "id")
        .expect("id column should exist");
    assert!(id.primary_key);
}

#[tokio::test(flavor = "multi_thread")]
async fn open_persists_to_a_file_across_reopens() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let path = dir.path().join("register.db");

    let store = SqliteStore::open(&path, DEFAULT_QUERY_TIMEOUT)
        .await
        .expect("open should create the file");
    store.migrate().await.expect("Migration should succeed");
    insert_asset(&store, "P-101A", "Feed pump", None, "PUMP", None, "ACTIVE").await;
    store.close().await;

    let reopened = SqliteStore::open(&path, DEFAULT_QUERY_TIMEOUT)
        .await
        .expect("open should find the file");
    reopened.migrate().await.expect("Migrations are idempotent");

    let plan = build_plan(&catalog::ASSET, &[], &FilterSet::new(), false, None);
    let (rows, total) = reopened
        .fetch_page(&plan)
        .await
        .expect("fetch should succeed");

    assert_eq!(total, 1);
    assert_eq!(Asset::from_row(&rows[0]).tag_no, "P-101A");
}
