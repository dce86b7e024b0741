//! Register row types.
//!
//! Timestamps stay TEXT in `YYYY-MM-DD HH:MM:SS` form end to end; the
//! register is read-only from this side, so there is nothing to gain
//! from parsing them.

use serde::Serialize;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

// ===== Entities =====

/// A tagged plant asset.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub id: i64,
    pub tag_no: String,
    pub description: String,
    pub area: Option<String>,
    pub asset_class: Option<String>,
    pub project_no: Option<String>,
    pub manufacturer: Option<String>,
    pub model_no: Option<String>,
    pub serial_no: Option<String>,
    pub status: String,
    pub commissioned_at: Option<String>,
    pub created_at: String,
}

impl Asset {
    pub fn from_row(row: &SqliteRow) -> Self {
        Self {
            id: row.get("id"),
            tag_no: row.get("tag_no"),
            description: row.get("description"),
            area: row.get("area"),
            asset_class: row.get("asset_class"),
            project_no: row.get("project_no"),
            manufacturer: row.get("manufacturer"),
            model_no: row.get("model_no"),
            serial_no: row.get("serial_no"),
            status: row.get("status"),
            commissioned_at: row.get("commissioned_at"),
            created_at: row.get("created_at"),
        }
    }
}

/// A controlled engineering document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: i64,
    pub doc_no: String,
    pub title: String,
    pub doc_type: Option<String>,
    pub revision: Option<String>,
    pub project_no: Option<String>,
    pub status: String,
    pub issued_at: Option<String>,
    pub created_at: String,
}

impl Document {
    pub fn from_row(row: &SqliteRow) -> Self {
        Self {
            id: row.get("id"),
            doc_no: row.get("doc_no"),
            title: row.get("title"),
            doc_type: row.get("doc_type"),
            revision: row.get("revision"),
            project_no: row.get("project_no"),
            status: row.get("status"),
            issued_at: row.get("issued_at"),
            created_at: row.get("created_at"),
        }
    }
}

/// A capital project that delivered assets and documents.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub project_no: String,
    pub title: String,
    pub status: String,
    pub manager: Option<String>,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub created_at: String,
}

impl Project {
    pub fn from_row(row: &SqliteRow) -> Self {
        Self {
            id: row.get("id"),
            project_no: row.get("project_no"),
            title: row.get("title"),
            status: row.get("status"),
            manager: row.get("manager"),
            started_at: row.get("started_at"),
            finished_at: row.get("finished_at"),
            created_at: row.get("created_at"),
        }
    }
}

// ===== Pagination =====

/// One page of results plus the unpaged total from the count query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: u32,
}
