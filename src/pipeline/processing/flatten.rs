use crate::app::ports::HttpGetResult;
use crate::error::{EtlError, Result};
use serde_json::{Map, Value};

static NULL: Value = Value::Null;

/// A JSON listing flattened to one row per element.
///
/// Nested objects become dotted column names (`fairings.reused`); arrays and
/// scalars stay as cell values. Columns keep first-seen order and a row
/// without a given column reads as `null`.
#[derive(Debug, Clone, Default)]
pub struct FlatTable {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl FlatTable {
    /// Decode an HTTP body and flatten it
    pub fn from_response(response: &HttpGetResult) -> Result<Self> {
        let value: Value = response.json()?;
        flatten(&value)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Cell at `row`/`column`, `null` when the row lacks it
    pub fn cell(&self, row: usize, column: &str) -> &Value {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }
}

/// Flatten a JSON array of objects into a table
pub fn flatten(value: &Value) -> Result<FlatTable> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(EtlError::UnexpectedShape(format!(
                "expected a JSON array of launches, got {}",
                type_name(other)
            )))
        }
    };

    let mut table = FlatTable::default();
    for (i, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| {
            EtlError::UnexpectedShape(format!(
                "element {} is {}, not an object",
                i,
                type_name(item)
            ))
        })?;

        let mut row = Map::new();
        flatten_into(&mut row, None, object);
        for key in row.keys() {
            if !table.has_column(key) {
                table.columns.push(key.clone());
            }
        }
        table.rows.push(row);
    }
    Ok(table)
}

fn flatten_into(row: &mut Map<String, Value>, prefix: Option<&str>, object: &Map<String, Value>) {
    for (key, value) in object {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(row, Some(&path), inner),
            _ => {
                row.insert(path, value.clone());
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_objects_become_dotted_columns() {
        let listing = json!([
            {
                "flight_number": 1,
                "fairings": { "reused": false, "recovered": null },
                "links": { "patch": { "small": "a.png" } },
                "cores": [{ "core": "c1" }]
            },
            {
                "flight_number": 2,
                "fairings": null,
                "cores": []
            }
        ]);

        let table = flatten(&listing).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns,
            vec![
                "flight_number",
                "fairings.reused",
                "fairings.recovered",
                "links.patch.small",
                "cores",
                "fairings",
            ]
        );
        assert_eq!(table.cell(0, "links.patch.small"), &json!("a.png"));
        assert_eq!(table.cell(0, "cores"), &json!([{ "core": "c1" }]));
        assert_eq!(table.cell(1, "fairings.reused"), &Value::Null);
        assert_eq!(table.cell(1, "cores"), &json!([]));
    }

    #[test]
    fn test_bare_object_is_not_a_listing() {
        match flatten(&json!({ "error": "Not Found" })) {
            Err(EtlError::UnexpectedShape(message)) => assert!(message.contains("an object")),
            other => panic!("expected unexpected shape, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_object_elements() {
        assert!(matches!(
            flatten(&json!([1, 2])),
            Err(EtlError::UnexpectedShape(_))
        ));
        assert!(matches!(
            flatten(&json!("nope")),
            Err(EtlError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_empty_listing() {
        let table = flatten(&json!([])).unwrap();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }
}
