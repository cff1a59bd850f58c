//! Bulk `configuration.import` of a template document

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zbx_api::RpcCaller;

use crate::errors::{ProvisionError, ProvisionResult};

const IMPORT_METHOD: &str = "configuration.import";

/// Document formats accepted by `configuration.import`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Xml,
    Json,
    Yaml,
}

impl ImportFormat {
    /// Pick the format from the file extension, falling back to XML
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => ImportFormat::Json,
            Some("yaml") | Some("yml") => ImportFormat::Yaml,
            _ => ImportFormat::Xml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportFormat::Xml => "xml",
            ImportFormat::Json => "json",
            ImportFormat::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRule {
    pub create_missing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_existing: Option<bool>,
}

impl ImportRule {
    const fn upsert() -> Self {
        Self {
            create_missing: true,
            update_existing: Some(true),
        }
    }

    const fn create_only() -> Self {
        Self {
            create_missing: true,
            update_existing: None,
        }
    }
}

/// The fixed per-object rules sent with every import.
///
/// Groups and template linkage are only ever created; everything else is also
/// updated when it already exists.
pub fn default_import_rules() -> BTreeMap<&'static str, ImportRule> {
    BTreeMap::from([
        ("applications", ImportRule::upsert()),
        ("discoveryRules", ImportRule::upsert()),
        ("graphs", ImportRule::upsert()),
        ("groups", ImportRule::create_only()),
        ("hosts", ImportRule::upsert()),
        ("images", ImportRule::upsert()),
        ("items", ImportRule::upsert()),
        ("maps", ImportRule::upsert()),
        ("screens", ImportRule::upsert()),
        ("templateLinkage", ImportRule::create_only()),
        ("templates", ImportRule::upsert()),
        ("triggers", ImportRule::upsert()),
    ])
}

/// A configuration document loaded from disk
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    pub path: PathBuf,
    pub format: ImportFormat,
    pub source: String,
}

impl TemplateDocument {
    pub async fn read(path: &Path) -> ProvisionResult<Self> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ProvisionError::TemplateFile {
                path: path.to_path_buf(),
                source,
            })?;

        let format = ImportFormat::from_path(path);
        debug!(
            "Read {} bytes of {} from {}",
            source.len(),
            format,
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            format,
            source,
        })
    }

    pub fn import_params(&self) -> Value {
        json!({
            "format": self.format,
            "rules": default_import_rules(),
            "source": self.source,
        })
    }
}

/// Import the document in one call. The API result is returned unchanged.
pub async fn import_configuration<C: RpcCaller + ?Sized>(
    caller: &C,
    document: &TemplateDocument,
) -> ProvisionResult<Value> {
    let result = caller.call(IMPORT_METHOD, document.import_params()).await?;
    info!("Imported {}", document.path.display());
    Ok(result)
}
