//! User records as delivered by the users endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the people table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub username: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            email: email.into(),
        }
    }

    /// Builds a record from an arbitrary payload element.
    ///
    /// Missing or `null` fields become empty strings; other non-string values
    /// keep their JSON text. A non-object element yields an all-empty record.
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: field_text(value.get("name")),
            username: field_text(value.get("username")),
            email: field_text(value.get("email")),
        }
    }

    /// Cells in display order: name, username, email.
    pub fn columns(&self) -> [&str; 3] {
        [&self.name, &self.username, &self.email]
    }
}

/// Textual form of a JSON value as shown in the table.
pub fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Records contained in a users payload.
///
/// Returns `None` when the payload is not an array or the array is empty.
/// Order is preserved; nothing is sorted or deduplicated.
pub fn records_from_payload(payload: &Value) -> Option<Vec<UserRecord>> {
    match payload {
        Value::Array(items) if !items.is_empty() => {
            Some(items.iter().map(UserRecord::from_value).collect())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use people_dom::escape_html;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_value_reads_fields() {
        let record = UserRecord::from_value(&json!({
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": { "city": "Gwenborough" }
        }));
        assert_eq!(
            record,
            UserRecord::new("Leanne Graham", "Bret", "Sincere@april.biz")
        );
        assert_eq!(record.columns(), ["Leanne Graham", "Bret", "Sincere@april.biz"]);
    }

    #[test]
    fn test_from_value_coerces_missing_and_scalars() {
        let record = UserRecord::from_value(&json!({
            "name": null,
            "username": 42,
        }));
        assert_eq!(record, UserRecord::new("", "42", ""));

        let from_scalar = UserRecord::from_value(&json!("just a string"));
        assert_eq!(from_scalar, UserRecord::default());
    }

    #[test]
    fn test_null_field_escapes_to_empty() {
        assert_eq!(escape_html(&field_text(None)), "");
        assert_eq!(escape_html(&field_text(Some(&Value::Null))), "");
        assert_eq!(escape_html(&field_text(Some(&json!("A&B")))), "A&amp;B");
        assert_eq!(escape_html(&field_text(Some(&json!(true)))), "true");
    }

    #[test]
    fn test_records_from_payload() {
        assert_eq!(records_from_payload(&json!([])), None);
        assert_eq!(records_from_payload(&json!({"users": []})), None);
        assert_eq!(records_from_payload(&json!("nope")), None);

        let records = records_from_payload(&json!([
            {"name": "b", "username": "b", "email": "b@x"},
            {"name": "a", "username": "a", "email": "a@x"},
            {"name": "b", "username": "b", "email": "b@x"},
        ]))
        .expect("non-empty array");
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "b"]);
    }
}
