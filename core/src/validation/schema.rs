use super::{Field, ValidationResult, Validator};
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value as JsonValue};

/// **SCHEMA**
///
/// **PURPOSE**: Ordered, immutable list of named fields describing one request shape.
/// **GUARANTEE**: Every declared field is validated; one failure never hides another.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Field)>,
}

/// Builder collecting `(name, Field)` pairs in declaration order.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, Field)>,
}

impl SchemaBuilder {
    /// **ADD FIELD** - a repeated name replaces the earlier declaration in place
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate against an explicit calendar day instead of the local clock.
    ///
    /// Anything other than a JSON object is treated as an empty mapping.
    pub fn validate_on(&self, input: Option<&JsonValue>, today: NaiveDate) -> ValidationResult {
        let empty = Map::new();
        let data = match input {
            Some(JsonValue::Object(map)) => map,
            _ => &empty,
        };

        let mut result = ValidationResult::default();
        for (name, field) in &self.fields {
            match field.validate_on(data.get(name), today) {
                Ok(value) => {
                    result.cleaned.insert(name.clone(), value);
                }
                Err(err) => {
                    result.errors.insert(name.clone(), err.to_string());
                }
            }
        }
        result
    }
}

impl Validator for Schema {
    type Output = ValidationResult;

    fn validate(&self, input: Option<&JsonValue>) -> Self::Output {
        self.validate_on(input, Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::messages;
    use serde_json::json;

    fn person_schema() -> Schema {
        Schema::builder()
            .field("name", Field::char().required())
            .field("email", Field::email())
            .field("gender", Field::gender().nullable())
            .build()
    }

    #[test]
    fn test_schema_success() {
        let result = person_schema().validate(Some(&json!({
            "name": "John Doe",
            "email": "john@example.com",
            "gender": 1,
            "ignored": true
        })));

        assert!(result.is_valid());
        assert_eq!(result.get_str("name"), Some("John Doe"));
        assert!(!result.cleaned.contains_key("ignored"));
    }

    #[test]
    fn test_schema_collects_every_error() {
        let result = person_schema().validate(Some(&json!({
            "email": "no-at-sign",
            "gender": 7
        })));

        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.errors["name"], messages::REQUIRED);
        assert_eq!(result.errors["email"], messages::NO_AT_SIGN);
        assert_eq!(result.errors["gender"], messages::GENDER);
    }

    #[test]
    fn test_schema_error_order_follows_declaration() {
        let result = person_schema().validate(Some(&json!({"gender": "x", "email": ""})));
        let names: Vec<&str> = result.errors.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["name", "email", "gender"]);
    }

    #[test]
    fn test_schema_absent_optional_fields_clean_to_null() {
        let result = person_schema().validate(Some(&json!({"name": "n"})));
        assert!(result.is_valid());
        assert_eq!(result.cleaned.len(), 3);
        assert_eq!(result.cleaned["email"], JsonValue::Null);
        assert_eq!(result.present_fields(), vec!["name"]);
    }

    #[test]
    fn test_schema_non_object_is_empty_mapping() {
        for input in [None, Some(json!(null)), Some(json!("text")), Some(json!([1]))] {
            let result = person_schema().validate(input.as_ref());
            assert_eq!(result.errors.len(), 1);
            assert_eq!(result.errors["name"], messages::REQUIRED);
        }
    }

    #[test]
    fn test_builder_redeclaration_keeps_position() {
        let schema = Schema::builder()
            .field("a", Field::char())
            .field("b", Field::char())
            .field("a", Field::char().required())
            .build();

        let names: Vec<&str> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(schema.fields().next().map(|(_, f)| f.is_required()).unwrap_or(false));
        assert_eq!(schema.len(), 2);
    }
}
