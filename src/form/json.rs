//! JSON form documents: the shipped template/document format.
//!
//! A template is a JSON object declaring an ordered list of named fields:
//!
//! ```json
//! {
//!   "title": "Incident Report",
//!   "fields": [
//!     {"name": "first", "label": "First name", "value": ""},
//!     {"name": "last",  "label": "Last name",  "value": ""},
//!     {"name": "reason","label": "Reason",     "value": ""}
//!   ]
//! }
//! ```
//!
//! Rendering writes a value into every field and serializes the document
//! back out; the completed document is the same shape as the template.

use crate::error::{ReportError, Result};
use crate::form::FormBackend;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct FormDocument {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    title: String,
    fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct FormField {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    value: String,
}

fn parse(template: &[u8]) -> Result<FormDocument> {
    serde_json::from_slice(template).map_err(|e| ReportError::TemplateParse {
        message: e.to_string(),
    })
}

/// Form backend over JSON form documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormBackend;

impl JsonFormBackend {
    pub fn new() -> Self {
        Self
    }
}

impl FormBackend for JsonFormBackend {
    fn field_names(&self, template: &[u8]) -> Result<Vec<String>> {
        Ok(parse(template)?
            .fields
            .into_iter()
            .map(|f| f.name)
            .collect())
    }

    fn render(&self, template: &[u8], values: &HashMap<String, String>) -> Result<Vec<u8>> {
        let mut document = parse(template)?;
        for field in &mut document.fields {
            field.value = values.get(&field.name).cloned().unwrap_or_default();
        }
        serde_json::to_vec_pretty(&document).map_err(|e| ReportError::Other(e.to_string()))
    }
}
