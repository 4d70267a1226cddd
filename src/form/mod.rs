//! Form boundary: fillable templates and field binding.
//!
//! A backend exposes a template's declared field names in order and renders
//! a completed document from `{field name: value}` pairs. Binding a record
//! to those fields is backend-independent and lives here.

pub mod json;

pub use json::JsonFormBackend;

use crate::artifact::IncidentRecord;
use crate::config::MappingMode;
use crate::error::{ReportError, Result};
use std::collections::HashMap;

/// Number of record fields a positional template must accommodate.
pub const REQUIRED_FIELDS: usize = 3;

/// Trait for document backends that fill named form fields.
///
/// This trait allows swapping implementations (the JSON form backend vs a
/// PDF form library adapter).
pub trait FormBackend: Send + Sync {
    /// A template's declared field names, in declaration order.
    fn field_names(&self, template: &[u8]) -> Result<Vec<String>>;

    /// Render the template with the given field values. Every declared
    /// field receives a value; fields missing from `values` render empty.
    fn render(&self, template: &[u8], values: &HashMap<String, String>) -> Result<Vec<u8>>;
}

/// Bind record fields to template fields.
///
/// Positional mode is the default contract: the first three declared fields
/// bind, in order, to `aggrieved_name`, `aggrieved_surname`,
/// `ReasonToContact`; the template must declare its fields in exactly this
/// order for correct results, and fewer than three declared fields is
/// [`ReportError::TemplateShape`]. Extra fields beyond the first three stay
/// unbound and render empty.
///
/// Named mode binds each template field to the record field of the same
/// name instead; fields with no matching record field render empty.
pub fn bind_fields(
    field_names: &[String],
    record: &IncidentRecord,
    mode: MappingMode,
) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    match mode {
        MappingMode::Positional => {
            if field_names.len() < REQUIRED_FIELDS {
                return Err(ReportError::TemplateShape {
                    expected: REQUIRED_FIELDS,
                    actual: field_names.len(),
                });
            }
            for (position, name) in field_names.iter().enumerate() {
                let value = IncidentRecord::FIELD_ORDER
                    .get(position)
                    .and_then(|record_field| record.field(record_field))
                    .unwrap_or_default();
                values.insert(name.clone(), value.to_string());
            }
        }
        MappingMode::Named => {
            for name in field_names {
                let value = record.field(name).unwrap_or_default();
                values.insert(name.clone(), value.to_string());
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IncidentRecord {
        IncidentRecord {
            aggrieved_name: "Jane".to_string(),
            aggrieved_surname: "Doe".to_string(),
            reason_to_contact: "burglary reported at 10pm".to_string(),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_binds_first_three_in_order() {
        let fields = names(&["first", "last", "reason"]);
        let values = bind_fields(&fields, &record(), MappingMode::Positional).unwrap();
        assert_eq!(values["first"], "Jane");
        assert_eq!(values["last"], "Doe");
        assert_eq!(values["reason"], "burglary reported at 10pm");
    }

    #[test]
    fn test_positional_extra_fields_render_empty() {
        let fields = names(&["first", "last", "reason", "date_time", "location"]);
        let values = bind_fields(&fields, &record(), MappingMode::Positional).unwrap();
        assert_eq!(values.len(), 5);
        assert_eq!(values["date_time"], "");
        assert_eq!(values["location"], "");
    }

    #[test]
    fn test_positional_too_few_fields_is_template_shape_error() {
        let fields = names(&["first", "last"]);
        let err = bind_fields(&fields, &record(), MappingMode::Positional).unwrap_err();
        assert!(matches!(
            err,
            ReportError::TemplateShape {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_positional_absent_record_values_render_empty() {
        let fields = names(&["first", "last", "reason"]);
        let empty = IncidentRecord::default();
        let values = bind_fields(&fields, &empty, MappingMode::Positional).unwrap();
        assert_eq!(values["first"], "");
        assert_eq!(values["last"], "");
        assert_eq!(values["reason"], "");
    }

    #[test]
    fn test_named_binds_by_field_name_regardless_of_order() {
        let fields = names(&["ReasonToContact", "aggrieved_name"]);
        let values = bind_fields(&fields, &record(), MappingMode::Named).unwrap();
        assert_eq!(values["ReasonToContact"], "burglary reported at 10pm");
        assert_eq!(values["aggrieved_name"], "Jane");
    }

    #[test]
    fn test_named_unknown_fields_render_empty() {
        let fields = names(&["aggrieved_name", "casualties"]);
        let values = bind_fields(&fields, &record(), MappingMode::Named).unwrap();
        assert_eq!(values["casualties"], "");
    }

    #[test]
    fn test_named_has_no_minimum_shape() {
        let fields = names(&["aggrieved_name"]);
        assert!(bind_fields(&fields, &record(), MappingMode::Named).is_ok());
    }
}
