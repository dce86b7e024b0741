//! Entity catalog: the identifier allow-list.
//!
//! Every table, column, and order key that can appear in SQL text is
//! declared here as a static. Caller-supplied strings never become
//! identifiers directly; the only path is a lookup through [`entity`],
//! after which the *static* definition is embedded.

// ===== Definitions =====

/// Retirement marker for an entity. Searches exclude rows whose status
/// column equals the marker unless `include_retired` is set; the
/// marker is builder-inlined as a literal, never bound.
#[derive(Debug)]
pub struct Retirement {
    pub column: &'static str,
    pub marker: &'static str,
}

/// Column metadata for `describe_table` output. `filter` names the
/// tool argument that targets the column, if one does.
#[derive(Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub filter: Option<&'static str>,
}

/// One searchable entity: its table reference, projection, ordering,
/// count key, and retirement rule.
#[derive(Debug)]
pub struct EntityDef {
    pub name: &'static str,
    /// FROM-clause reference including alias, e.g. `"asset a"`.
    pub table: &'static str,
    /// Unaliased table name, for PRAGMA introspection.
    pub base_table: &'static str,
    /// Aliased primary key, the COUNT(DISTINCT ...) key under joins.
    pub key: &'static str,
    pub select_list: &'static str,
    pub order_by: &'static str,
    pub retirement: Option<Retirement>,
    pub default_limit: u32,
    pub columns: &'static [ColumnDef],
}

/// An INNER JOIN hop used by the link-traversal tools.
#[derive(Debug)]
pub struct Join {
    pub table: &'static str,
    pub on: &'static str,
}

// ===== Filterable columns =====

pub mod columns {
    pub const ASSET_TAG_NO: &str = "a.tag_no";
    pub const ASSET_DESCRIPTION: &str = "a.description";
    pub const ASSET_AREA: &str = "a.area";
    pub const ASSET_CLASS: &str = "a.asset_class";
    pub const ASSET_PROJECT_NO: &str = "a.project_no";
    pub const ASSET_MANUFACTURER: &str = "a.manufacturer";
    pub const ASSET_SERIAL_NO: &str = "a.serial_no";

    pub const DOCUMENT_DOC_NO: &str = "d.doc_no";
    pub const DOCUMENT_TITLE: &str = "d.title";
    pub const DOCUMENT_DOC_TYPE: &str = "d.doc_type";
    pub const DOCUMENT_REVISION: &str = "d.revision";
    pub const DOCUMENT_PROJECT_NO: &str = "d.project_no";

    pub const PROJECT_PROJECT_NO: &str = "p.project_no";
    pub const PROJECT_TITLE: &str = "p.title";
    pub const PROJECT_STATUS: &str = "p.status";
}

// ===== Entities =====

pub static ASSET: EntityDef = EntityDef {
    name: "asset",
    table: "asset a",
    base_table: "asset",
    key: "a.id",
    select_list: "a.id, a.tag_no, a.description, a.area, a.asset_class, a.project_no, \
                  a.manufacturer, a.model_no, a.serial_no, a.status, a.commissioned_at, \
                  a.created_at",
    order_by: "a.tag_no",
    retirement: Some(Retirement {
        column: "a.status",
        marker: "RETIRED",
    }),
    default_limit: 50,
    columns: &[
        ColumnDef {
            name: "id",
            filter: None,
        },
        ColumnDef {
            name: "tag_no",
            filter: Some("tag_no"),
        },
        ColumnDef {
            name: "description",
            filter: Some("description"),
        },
        ColumnDef {
            name: "area",
            filter: Some("area"),
        },
        ColumnDef {
            name: "asset_class",
            filter: Some("asset_classes"),
        },
        ColumnDef {
            name: "project_no",
            filter: Some("project_number"),
        },
        ColumnDef {
            name: "manufacturer",
            filter: Some("manufacturer"),
        },
        ColumnDef {
            name: "model_no",
            filter: None,
        },
        ColumnDef {
            name: "serial_no",
            filter: Some("has_serial_no"),
        },
        ColumnDef {
            name: "status",
            filter: None,
        },
        ColumnDef {
            name: "commissioned_at",
            filter: None,
        },
        ColumnDef {
            name: "created_at",
            filter: None,
        },
    ],
};

pub static DOCUMENT: EntityDef = EntityDef {
    name: "document",
    table: "document d",
    base_table: "document",
    key: "d.id",
    select_list: "d.id, d.doc_no, d.title, d.doc_type, d.revision, d.project_no, d.status, \
                  d.issued_at, d.created_at",
    order_by: "d.doc_no",
    retirement: Some(Retirement {
        column: "d.status",
        marker: "SUPERSEDED",
    }),
    default_limit: 100,
    columns: &[
        ColumnDef {
            name: "id",
            filter: None,
        },
        ColumnDef {
            name: "doc_no",
            filter: Some("doc_no"),
        },
        ColumnDef {
            name: "title",
            filter: Some("title"),
        },
        ColumnDef {
            name: "doc_type",
            filter: Some("doc_type"),
        },
        ColumnDef {
            name: "revision",
            filter: Some("revision"),
        },
        ColumnDef {
            name: "project_no",
            filter: Some("project_number"),
        },
        ColumnDef {
            name: "status",
            filter: None,
        },
        ColumnDef {
            name: "issued_at",
            filter: None,
        },
        ColumnDef {
            name: "created_at",
            filter: None,
        },
    ],
};

pub static PROJECT: EntityDef = EntityDef {
    name: "project",
    table: "project p",
    base_table: "project",
    key: "p.id",
    select_list: "p.id, p.project_no, p.title, p.status, p.manager, p.started_at, \
                  p.finished_at, p.created_at",
    order_by: "p.project_no",
    retirement: Some(Retirement {
        column: "p.status",
        marker: "CLOSED",
    }),
    default_limit: 50,
    columns: &[
        ColumnDef {
            name: "id",
            filter: None,
        },
        ColumnDef {
            name: "project_no",
            filter: Some("project_number"),
        },
        ColumnDef {
            name: "title",
            filter: Some("title"),
        },
        ColumnDef {
            name: "status",
            filter: Some("status"),
        },
        ColumnDef {
            name: "manager",
            filter: None,
        },
        ColumnDef {
            name: "started_at",
            filter: None,
        },
        ColumnDef {
            name: "finished_at",
            filter: None,
        },
        ColumnDef {
            name: "created_at",
            filter: None,
        },
    ],
};

/// Link table, describable but not searched directly.
pub static ASSET_DOCUMENT: EntityDef = EntityDef {
    name: "asset_document",
    table: "asset_document ad",
    base_table: "asset_document",
    key: "ad.asset_id",
    select_list: "ad.asset_id, ad.document_id",
    order_by: "ad.asset_id",
    retirement: None,
    default_limit: 100,
    columns: &[
        ColumnDef {
            name: "asset_id",
            filter: None,
        },
        ColumnDef {
            name: "document_id",
            filter: None,
        },
    ],
};

// ===== Joins =====

/// Hops from `document d` back to the owning asset, for listing the
/// documents linked to one asset.
pub static DOCUMENTS_OF_ASSET: [Join; 2] = [
    Join {
        table: "asset_document ad",
        on: "ad.document_id = d.id",
    },
    Join {
        table: "asset a",
        on: "a.id = ad.asset_id",
    },
];

/// Hops from `asset a` back to the owning document, for listing the
/// assets covered by one document.
pub static ASSETS_OF_DOCUMENT: [Join; 2] = [
    Join {
        table: "asset_document ad",
        on: "ad.asset_id = a.id",
    },
    Join {
        table: "document d",
        on: "d.id = ad.document_id",
    },
];

// ===== Lookup =====

static ENTITIES: [&EntityDef; 4] = [&ASSET, &DOCUMENT, &PROJECT, &ASSET_DOCUMENT];

/// Resolve a caller-supplied name against the allow-list. Matching is
/// case-insensitive; anything not in the catalog resolves to `None`.
pub fn entity(name: &str) -> Option<&'static EntityDef> {
    let wanted = name.trim().to_ascii_lowercase();
    ENTITIES.iter().copied().find(|e| e.name == wanted)
}

/// Names accepted by [`entity`], for error messages.
pub fn entity_names() -> Vec<&'static str> {
    ENTITIES.iter().map(|e| e.name).collect()
}
