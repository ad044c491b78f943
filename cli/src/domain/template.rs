//! Template document model: parameter schema and code packaging rewrite.
//!
//! Templates are kept as a generic YAML tree so that everything this tool
//! does not touch (including short-form intrinsic tags such as `!Ref`)
//! survives the parse/render round trip.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::domain::error::TemplateError;

/// Resource type whose local `Code` directory is packaged and uploaded.
pub const FUNCTION_RESOURCE_TYPE: &str = "AWS::Lambda::Function";

/// One entry of the template's `Parameters` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub description: Option<String>,
    pub default: Option<String>,
}

impl ParameterSpec {
    /// Parameters without a default must be supplied.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A function resource whose code is a local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeReference {
    pub resource: String,
    pub path: String,
}

/// Parsed template document.
#[derive(Debug, Clone)]
pub struct Template {
    doc: Value,
}

impl Template {
    /// Parse a YAML (or JSON) template body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid YAML or has no `Resources`.
    pub fn parse(body: &str) -> Result<Self, TemplateError> {
        let doc: Value =
            serde_yaml::from_str(body).map_err(|e| TemplateError::Parse(e.to_string()))?;
        if doc.get("Resources").and_then(Value::as_mapping).is_none() {
            return Err(TemplateError::NoResources);
        }
        Ok(Self { doc })
    }

    /// The `Parameters` section in declaration order.
    #[must_use]
    pub fn parameters(&self) -> Vec<ParameterSpec> {
        let Some(params) = self.doc.get("Parameters").and_then(Value::as_mapping) else {
            return Vec::new();
        };
        params
            .iter()
            .filter_map(|(name, schema)| {
                Some(ParameterSpec {
                    name: name.as_str()?.to_string(),
                    description: schema
                        .get("Description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    default: schema.get("Default").and_then(scalar_to_string),
                })
            })
            .collect()
    }

    /// Function resources whose `Properties.Code` is a local path.
    #[must_use]
    pub fn code_references(&self) -> Vec<CodeReference> {
        let Some(resources) = self.doc.get("Resources").and_then(Value::as_mapping) else {
            return Vec::new();
        };
        resources
            .iter()
            .filter_map(|(name, resource)| {
                if resource.get("Type").and_then(Value::as_str) != Some(FUNCTION_RESOURCE_TYPE) {
                    return None;
                }
                let path = resource.get("Properties")?.get("Code")?.as_str()?;
                Some(CodeReference {
                    resource: name.as_str()?.to_string(),
                    path: path.to_string(),
                })
            })
            .collect()
    }

    /// Point a function resource's code at an uploaded bundle.
    ///
    /// Returns `false` when the resource has no `Properties` mapping.
    pub fn set_code_location(&mut self, resource: &str, bucket: &str, key: &str) -> bool {
        let Some(properties) = self
            .doc
            .get_mut("Resources")
            .and_then(|r| r.get_mut(resource))
            .and_then(|r| r.get_mut("Properties"))
            .and_then(Value::as_mapping_mut)
        else {
            return false;
        };
        let mut location = Mapping::new();
        location.insert("S3Key".into(), key.into());
        location.insert("S3Bucket".into(), bucket.into());
        properties.insert("Code".into(), Value::Mapping(location));
        true
    }

    /// Serialize back to a YAML template body.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn render(&self) -> Result<String, TemplateError> {
        serde_yaml::to_string(&self.doc).map_err(|e| TemplateError::Render(e.to_string()))
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Merge supplied values with schema defaults, in schema order.
///
/// # Errors
///
/// Returns an error if a required parameter has no value or a supplied key
/// is not declared by the template.
pub fn resolve_parameters(
    schema: &[ParameterSpec],
    supplied: &BTreeMap<String, String>,
) -> Result<Vec<(String, String)>, TemplateError> {
    if let Some(key) = supplied.keys().find(|k| !schema.iter().any(|p| &p.name == *k)) {
        return Err(TemplateError::UnknownParameter {
            key: key.clone(),
            valid: schema
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }
    schema
        .iter()
        .map(|p| {
            supplied
                .get(&p.name)
                .or(p.default.as_ref())
                .map(|v| (p.name.clone(), v.clone()))
                .ok_or_else(|| TemplateError::MissingParameter(p.name.clone()))
        })
        .collect()
}

/// Directory a code reference points at: relative to the template's folder.
#[must_use]
pub fn code_directory(template_path: &Path, code: &str) -> PathBuf {
    template_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(code)
}

/// Object key for a packaged code directory: its path relative to `cwd`,
/// with `/` separators and a `.zip` suffix.
#[must_use]
pub fn asset_key(cwd: &Path, code_dir: &Path) -> String {
    let base = normalize(cwd);
    let target = normalize(&cwd.join(code_dir));
    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let parts: Vec<String> = std::iter::repeat_n("..".to_string(), base.len() - common)
        .chain(target[common..].iter().cloned())
        .collect();
    format!("{}.zip", parts.join("/"))
}

/// Lexically resolve `.` and `..`; the root and prefix are kept as one part.
fn normalize(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last().map(String::as_str) {
                Some("/") => {}
                Some("..") | None => parts.push("..".to_string()),
                Some(_) => {
                    parts.pop();
                }
            },
            Component::RootDir => parts.push("/".to_string()),
            Component::Prefix(p) => parts.push(p.as_os_str().to_string_lossy().into_owned()),
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
        }
    }
    parts
}

// ── Unit tests ───────────────────────────────────────────────────────────────
