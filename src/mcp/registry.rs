//! Tool registry.
//!
//! The tool set is a closed enum: adding a tool means adding a variant
//! and descriptor here plus a dispatch arm. There is no runtime
//! registration to drift out of sync with the dispatcher.

use serde_json::json;

use super::protocol::ToolDescriptor;

/// Every tool this server serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    SearchAssets,
    GetAsset,
    SearchDocuments,
    SearchProjects,
    ListAssetDocuments,
    ListDocumentAssets,
    DescribeTable,
}

impl ToolName {
    pub const ALL: [ToolName; 7] = [
        ToolName::SearchAssets,
        ToolName::GetAsset,
        ToolName::SearchDocuments,
        ToolName::SearchProjects,
        ToolName::ListAssetDocuments,
        ToolName::ListDocumentAssets,
        ToolName::DescribeTable,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "search_assets" => Some(ToolName::SearchAssets),
            "get_asset" => Some(ToolName::GetAsset),
            "search_documents" => Some(ToolName::SearchDocuments),
            "search_projects" => Some(ToolName::SearchProjects),
            "list_asset_documents" => Some(ToolName::ListAssetDocuments),
            "list_document_assets" => Some(ToolName::ListDocumentAssets),
            "describe_table" => Some(ToolName::DescribeTable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::SearchAssets => "search_assets",
            ToolName::GetAsset => "get_asset",
            ToolName::SearchDocuments => "search_documents",
            ToolName::SearchProjects => "search_projects",
            ToolName::ListAssetDocuments => "list_asset_documents",
            ToolName::ListDocumentAssets => "list_document_assets",
            ToolName::DescribeTable => "describe_table",
        }
    }

    /// Descriptor served by `tools/list`.
    pub fn descriptor(&self) -> ToolDescriptor {
        match self {
            ToolName::SearchAssets => ToolDescriptor {
                name: self.as_str(),
                description: "Search the asset register. All filters are optional and AND-combined; \
                              retired assets are excluded unless include_retired is set.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "tag_no": {"type": "string", "description": "Substring of the tag number; internal whitespace is ignored"},
                        "description": {"type": "string", "description": "Substring of the description"},
                        "area": {"type": "string", "description": "Exact plant area"},
                        "asset_classes": {"type": "array", "items": {"type": "string"}, "description": "Match any of these asset classes"},
                        "project_number": {"type": "string", "description": "Delivering project number prefix"},
                        "manufacturer": {"type": "string", "description": "Exact manufacturer name"},
                        "has_serial_no": {"type": "boolean", "description": "true: only assets with a recorded serial number; false: only without"},
                        "include_retired": {"type": "boolean", "description": "Include RETIRED assets (default false)"},
                        "limit": {"type": "integer", "description": "Page size, 1-500 (default 50)"}
                    },
                    "additionalProperties": false
                }),
            },
            ToolName::GetAsset => ToolDescriptor {
                name: self.as_str(),
                description: "Fetch one asset by exact tag number, with its linked documents. \
                              Finds the asset regardless of retirement state.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "tag_no": {"type": "string", "description": "Exact tag number; whitespace is ignored"}
                    },
                    "required": ["tag_no"],
                    "additionalProperties": false
                }),
            },
            ToolName::SearchDocuments => ToolDescriptor {
                name: self.as_str(),
                description: "Search the document register. Superseded revisions are excluded \
                              unless include_retired is set.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "doc_no": {"type": "string", "description": "Document number prefix"},
                        "title": {"type": "string", "description": "Substring of the title"},
                        "doc_type": {"type": "string", "description": "Exact document type code"},
                        "revision": {"type": "string", "description": "Exact revision code"},
                        "project_number": {"type": "string", "description": "Originating project number prefix"},
                        "include_retired": {"type": "boolean", "description": "Include SUPERSEDED documents (default false)"},
                        "limit": {"type": "integer", "description": "Page size, 1-500 (default 100)"}
                    },
                    "additionalProperties": false
                }),
            },
            ToolName::SearchProjects => ToolDescriptor {
                name: self.as_str(),
                description: "Search the project register. Closed projects are excluded unless \
                              include_retired is set.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "project_number": {"type": "string", "description": "Project number prefix"},
                        "title": {"type": "string", "description": "Substring of the title"},
                        "status": {"type": "string", "description": "Exact status code"},
                        "include_retired": {"type": "boolean", "description": "Include CLOSED projects (default false)"},
                        "limit": {"type": "integer", "description": "Page size, 1-500 (default 50)"}
                    },
                    "additionalProperties": false
                }),
            },
            ToolName::ListAssetDocuments => ToolDescriptor {
                name: self.as_str(),
                description: "List the documents linked to one asset. Superseded revisions \
                              are hidden unless include_retired is set.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "tag_no": {"type": "string", "description": "Exact tag number of the asset"},
                        "doc_type": {"type": "string", "description": "Restrict to one document type code"},
                        "include_retired": {"type": "boolean", "description": "Include SUPERSEDED documents (default false)"},
                        "limit": {"type": "integer", "description": "Page size, 1-500 (default 100)"}
                    },
                    "required": ["tag_no"],
                    "additionalProperties": false
                }),
            },
            ToolName::ListDocumentAssets => ToolDescriptor {
                name: self.as_str(),
                description: "List the assets covered by one document. Retired assets are \
                              hidden unless include_retired is set.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "doc_no": {"type": "string", "description": "Exact document number"},
                        "area": {"type": "string", "description": "Restrict to one plant area"},
                        "include_retired": {"type": "boolean", "description": "Include RETIRED assets (default false)"},
                        "limit": {"type": "integer", "description": "Page size, 1-500 (default 100)"}
                    },
                    "required": ["doc_no"],
                    "additionalProperties": false
                }),
            },
            ToolName::DescribeTable => ToolDescriptor {
                name: self.as_str(),
                description: "Describe one register table: live column metadata plus which \
                              search argument targets each column.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "table": {"type": "string", "description": "One of: asset, document, project, asset_document"}
                    },
                    "required": ["table"],
                    "additionalProperties": false
                }),
            },
        }
    }
}

/// Descriptors for every tool, in declaration order.
pub fn descriptors() -> Vec<ToolDescriptor> {
    ToolName::ALL.iter().map(ToolName::descriptor).collect()
}
