//! Validation of tool input against a JSON Schema subset
//!
//! Supports the keywords tool schemas (hand-written or generated by schemars)
//! actually use: `type`, `enum`, `const`, `properties`, `required`,
//! `additionalProperties`, `items`, `minItems`/`maxItems`,
//! `minLength`/`maxLength`, `minimum`/`maximum` (and the exclusive forms),
//! `allOf`/`anyOf`/`oneOf` and local `$ref`s. Unknown keywords are ignored.
//!
//! Validation stops at the first violation.

use serde_json::{Map, Value};
use thiserror::Error;

/// Longest rendering of an offending value inside a message
const MAX_VALUE_LEN: usize = 80;

/// A single schema violation, located by a `$`-rooted path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Validate `instance` against `schema`
pub fn validate(schema: &Value, instance: &Value) -> Result<(), ValidationError> {
    Validator { root: schema }.check(schema, instance, "$")
}

struct Validator<'a> {
    root: &'a Value,
}

impl<'a> Validator<'a> {
    fn check(&self, schema: &'a Value, instance: &Value, path: &str) -> Result<(), ValidationError> {
        let keywords = match schema {
            Value::Bool(true) => return Ok(()),
            Value::Bool(false) => {
                return Err(ValidationError::new(
                    path,
                    format!("False schema does not allow {}", describe(instance)),
                ))
            }
            Value::Object(keywords) => keywords,
            _ => return Ok(()),
        };

        // Siblings of $ref are ignored, as in draft 7
        if let Some(reference) = keywords.get("$ref").and_then(Value::as_str) {
            let target = self.resolve(reference).ok_or_else(|| {
                ValidationError::new(path, format!("cannot resolve reference '{}'", reference))
            })?;
            return self.check(target, instance, path);
        }

        if let Some(expected) = keywords.get("type") {
            check_type(expected, instance, path)?;
        }

        if let Some(Value::Array(options)) = keywords.get("enum") {
            if !options.contains(instance) {
                return Err(ValidationError::new(
                    path,
                    format!(
                        "{} is not one of {}",
                        describe(instance),
                        describe(&Value::Array(options.clone()))
                    ),
                ));
            }
        }

        if let Some(constant) = keywords.get("const") {
            if constant != instance {
                return Err(ValidationError::new(
                    path,
                    format!("{} was expected", describe(constant)),
                ));
            }
        }

        match instance {
            Value::Number(_) => check_number(keywords, instance, path)?,
            Value::String(s) => check_string(keywords, s, path)?,
            Value::Array(items) => self.check_array(keywords, items, path)?,
            Value::Object(properties) => self.check_object(keywords, properties, path)?,
            _ => {}
        }

        self.check_combinators(keywords, instance, path)
    }

    fn resolve(&self, reference: &str) -> Option<&'a Value> {
        let pointer = reference.strip_prefix('#')?;
        if pointer.is_empty() {
            return Some(self.root);
        }
        self.root.pointer(pointer)
    }

    fn check_array(
        &self,
        keywords: &'a Map<String, Value>,
        items: &[Value],
        path: &str,
    ) -> Result<(), ValidationError> {
        if let Some(min) = keywords.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < min {
                return Err(ValidationError::new(
                    path,
                    format!("{} is too short", describe(&Value::Array(items.to_vec()))),
                ));
            }
        }
        if let Some(max) = keywords.get("maxItems").and_then(Value::as_u64) {
            if (items.len() as u64) > max {
                return Err(ValidationError::new(
                    path,
                    format!("{} is too long", describe(&Value::Array(items.to_vec()))),
                ));
            }
        }

        match keywords.get("items") {
            Some(Value::Array(positional)) => {
                for (index, (item, schema)) in items.iter().zip(positional).enumerate() {
                    self.check(schema, item, &format!("{}[{}]", path, index))?;
                }
            }
            Some(schema) => {
                for (index, item) in items.iter().enumerate() {
                    self.check(schema, item, &format!("{}[{}]", path, index))?;
                }
            }
            None => {}
        }
        Ok(())
    }

    fn check_object(
        &self,
        keywords: &'a Map<String, Value>,
        object: &Map<String, Value>,
        path: &str,
    ) -> Result<(), ValidationError> {
        if let Some(Value::Array(required)) = keywords.get("required") {
            for name in required.iter().filter_map(Value::as_str) {
                if !object.contains_key(name) {
                    return Err(ValidationError::new(
                        path,
                        format!("'{}' is a required property", name),
                    ));
                }
            }
        }

        let declared = keywords.get("properties").and_then(Value::as_object);
        if let Some(declared) = declared {
            for (name, schema) in declared {
                if let Some(value) = object.get(name) {
                    self.check(schema, value, &format!("{}.{}", path, name))?;
                }
            }
        }

        let extras: Vec<&String> = object
            .keys()
            .filter(|name| declared.map_or(true, |d| !d.contains_key(*name)))
            .collect();

        match keywords.get("additionalProperties") {
            Some(Value::Bool(false)) if !extras.is_empty() => {
                let names = extras
                    .iter()
                    .map(|name| format!("'{}'", name))
                    .collect::<Vec<_>>()
                    .join(", ");
                let verb = if extras.len() == 1 { "was" } else { "were" };
                Err(ValidationError::new(
                    path,
                    format!(
                        "Additional properties are not allowed ({} {} unexpected)",
                        names, verb
                    ),
                ))
            }
            Some(schema @ Value::Object(_)) => {
                for name in extras {
                    self.check(schema, &object[name], &format!("{}.{}", path, name))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn check_combinators(
        &self,
        keywords: &'a Map<String, Value>,
        instance: &Value,
        path: &str,
    ) -> Result<(), ValidationError> {
        if let Some(Value::Array(schemas)) = keywords.get("allOf") {
            for schema in schemas {
                self.check(schema, instance, path)?;
            }
        }

        if let Some(Value::Array(schemas)) = keywords.get("anyOf") {
            if !schemas
                .iter()
                .any(|schema| self.check(schema, instance, path).is_ok())
            {
                return Err(ValidationError::new(
                    path,
                    format!(
                        "{} is not valid under any of the given schemas",
                        describe(instance)
                    ),
                ));
            }
        }

        if let Some(Value::Array(schemas)) = keywords.get("oneOf") {
            let matches = schemas
                .iter()
                .filter(|schema| self.check(schema, instance, path).is_ok())
                .count();
            if matches == 0 {
                return Err(ValidationError::new(
                    path,
                    format!(
                        "{} is not valid under any of the given schemas",
                        describe(instance)
                    ),
                ));
            }
            if matches > 1 {
                return Err(ValidationError::new(
                    path,
                    format!(
                        "{} is valid under each of {} schemas",
                        describe(instance),
                        matches
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn check_type(expected: &Value, instance: &Value, path: &str) -> Result<(), ValidationError> {
    let names: Vec<&str> = match expected {
        Value::String(name) => vec![name.as_str()],
        Value::Array(names) => names.iter().filter_map(Value::as_str).collect(),
        _ => return Ok(()),
    };

    if names.iter().any(|name| is_type(name, instance)) {
        return Ok(());
    }

    let expected = names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ");
    Err(ValidationError::new(
        path,
        format!("{} is not of type {}", describe(instance), expected),
    ))
}

fn is_type(name: &str, instance: &Value) -> bool {
    match name {
        "object" => instance.is_object(),
        "array" => instance.is_array(),
        "string" => instance.is_string(),
        "boolean" => instance.is_boolean(),
        "null" => instance.is_null(),
        "number" => instance.is_number(),
        "integer" => {
            instance.is_i64()
                || instance.is_u64()
                || instance.as_f64().map_or(false, |n| n.fract() == 0.0)
        }
        // Unknown type names do not constrain
        _ => true,
    }
}

fn check_number(
    keywords: &Map<String, Value>,
    instance: &Value,
    path: &str,
) -> Result<(), ValidationError> {
    let Some(n) = instance.as_f64() else {
        return Ok(());
    };
    let bound = |key: &str| keywords.get(key).and_then(Value::as_f64);

    if let Some(min) = bound("minimum") {
        if n < min {
            return Err(ValidationError::new(
                path,
                format!("{} is less than the minimum of {}", instance, min),
            ));
        }
    }
    if let Some(max) = bound("maximum") {
        if n > max {
            return Err(ValidationError::new(
                path,
                format!("{} is greater than the maximum of {}", instance, max),
            ));
        }
    }
    if let Some(min) = bound("exclusiveMinimum") {
        if n <= min {
            return Err(ValidationError::new(
                path,
                format!(
                    "{} is less than or equal to the minimum of {}",
                    instance, min
                ),
            ));
        }
    }
    if let Some(max) = bound("exclusiveMaximum") {
        if n >= max {
            return Err(ValidationError::new(
                path,
                format!(
                    "{} is greater than or equal to the maximum of {}",
                    instance, max
                ),
            ));
        }
    }
    Ok(())
}

fn check_string(
    keywords: &Map<String, Value>,
    value: &str,
    path: &str,
) -> Result<(), ValidationError> {
    let length = value.chars().count() as u64;

    if let Some(min) = keywords.get("minLength").and_then(Value::as_u64) {
        if length < min {
            return Err(ValidationError::new(
                path,
                format!("'{}' is too short", value),
            ));
        }
    }
    if let Some(max) = keywords.get("maxLength").and_then(Value::as_u64) {
        if length > max {
            return Err(ValidationError::new(path, format!("'{}' is too long", value)));
        }
    }
    Ok(())
}

/// Compact rendering of a value for messages, truncated on a char boundary
fn describe(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= MAX_VALUE_LEN {
        return rendered;
    }
    let truncated: String = rendered.chars().take(MAX_VALUE_LEN).collect();
    format!("{}…", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn country_schema() -> Value {
        json!({
            "type": "object",
            "properties": {"name": {"type": "string", "description": "e.g. 'france'"}},
            "required": ["name"],
            "additionalProperties": false
        })
    }

    #[test]
    fn test_valid_input() {
        assert!(validate(&country_schema(), &json!({"name": "france"})).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let err = validate(&country_schema(), &json!({})).unwrap_err();
        assert_eq!(err.path, "$");
        assert_eq!(err.message, "'name' is a required property");
        assert_eq!(err.to_string(), "$: 'name' is a required property");
    }

    #[test]
    fn test_additional_properties_rejected() {
        let err = validate(&country_schema(), &json!({"name": "france", "extra": 1})).unwrap_err();
        assert_eq!(
            err.message,
            "Additional properties are not allowed ('extra' was unexpected)"
        );
    }

    #[test]
    fn test_additional_properties_allowed_without_flag() {
        let schema = json!({"type": "object", "properties": {"a": {"type": "string"}}});
        assert!(validate(&schema, &json!({"a": "x", "b": 2})).is_ok());
    }

    #[test]
    fn test_additional_properties_schema() {
        let schema = json!({"type": "object", "additionalProperties": {"type": "integer"}});
        assert!(validate(&schema, &json!({"a": 1, "b": 2})).is_ok());

        let err = validate(&schema, &json!({"a": 1, "b": "two"})).unwrap_err();
        assert_eq!(err.path, "$.b");
    }

    #[test]
    fn test_wrong_property_type_reports_path() {
        let err = validate(&country_schema(), &json!({"name": 5})).unwrap_err();
        assert_eq!(err.path, "$.name");
        assert_eq!(err.message, "5 is not of type 'string'");
    }

    #[test]
    fn test_non_object_input() {
        let err = validate(&country_schema(), &json!("france")).unwrap_err();
        assert_eq!(err.message, "\"france\" is not of type 'object'");

        let err = validate(&country_schema(), &Value::Null).unwrap_err();
        assert_eq!(err.message, "null is not of type 'object'");
    }

    #[test]
    fn test_integer_versus_number() {
        let schema = json!({"type": "integer"});
        assert!(validate(&schema, &json!(3)).is_ok());
        assert!(validate(&schema, &json!(3.0)).is_ok());
        assert!(validate(&schema, &json!(3.5)).is_err());

        let schema = json!({"type": "number"});
        assert!(validate(&schema, &json!(3.5)).is_ok());
        assert!(validate(&schema, &json!("3.5")).is_err());
    }

    #[test]
    fn test_type_list_accepts_null() {
        let schema = json!({"type": ["string", "null"]});
        assert!(validate(&schema, &Value::Null).is_ok());
        assert!(validate(&schema, &json!("x")).is_ok());

        let err = validate(&schema, &json!(1)).unwrap_err();
        assert_eq!(err.message, "1 is not of type 'string', 'null'");
    }

    #[test]
    fn test_enum_and_const() {
        let schema = json!({"enum": ["metric", "imperial"]});
        assert!(validate(&schema, &json!("metric")).is_ok());
        let err = validate(&schema, &json!("kelvin")).unwrap_err();
        assert!(err.message.contains("is not one of"));

        let schema = json!({"const": 42});
        assert!(validate(&schema, &json!(42)).is_ok());
        assert!(validate(&schema, &json!(41)).is_err());
    }

    #[test]
    fn test_string_length_counts_chars() {
        let schema = json!({"type": "string", "minLength": 2, "maxLength": 3});
        assert!(validate(&schema, &json!("çé")).is_ok());
        assert!(validate(&schema, &json!("a")).is_err());
        assert!(validate(&schema, &json!("abcd")).is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        let schema = json!({"type": "number", "minimum": -90, "maximum": 90});
        assert!(validate(&schema, &json!(48.85)).is_ok());
        let err = validate(&schema, &json!(91)).unwrap_err();
        assert_eq!(err.message, "91 is greater than the maximum of 90");

        let schema = json!({"exclusiveMinimum": 0});
        assert!(validate(&schema, &json!(0)).is_err());
        assert!(validate(&schema, &json!(0.1)).is_ok());
    }

    #[test]
    fn test_array_items_and_bounds() {
        let schema = json!({"type": "array", "items": {"type": "string"}, "maxItems": 2});
        assert!(validate(&schema, &json!(["a", "b"])).is_ok());

        let err = validate(&schema, &json!(["a", 2])).unwrap_err();
        assert_eq!(err.path, "$[1]");

        assert!(validate(&schema, &json!(["a", "b", "c"])).is_err());
    }

    #[test]
    fn test_ref_resolution() {
        let schema = json!({
            "type": "object",
            "properties": {"unit": {"$ref": "#/definitions/Unit"}},
            "definitions": {"Unit": {"type": "string", "enum": ["c", "f"]}}
        });
        assert!(validate(&schema, &json!({"unit": "c"})).is_ok());
        assert!(validate(&schema, &json!({"unit": "k"})).is_err());

        let broken = json!({"$ref": "#/definitions/Missing"});
        let err = validate(&broken, &json!(1)).unwrap_err();
        assert!(err.message.contains("cannot resolve reference"));
    }

    #[test]
    fn test_combinators() {
        let any_of = json!({"anyOf": [{"type": "string"}, {"type": "integer"}]});
        assert!(validate(&any_of, &json!(1)).is_ok());
        assert!(validate(&any_of, &json!(true)).is_err());

        let one_of = json!({"oneOf": [{"type": "number"}, {"type": "integer"}]});
        let err = validate(&one_of, &json!(1)).unwrap_err();
        assert!(err.message.contains("is valid under each of 2 schemas"));

        let all_of = json!({"allOf": [{"type": "string"}, {"minLength": 3}]});
        assert!(validate(&all_of, &json!("abc")).is_ok());
        assert!(validate(&all_of, &json!("ab")).is_err());
    }

    #[test]
    fn test_boolean_schemas() {
        assert!(validate(&json!(true), &json!({"anything": 1})).is_ok());
        assert!(validate(&json!(false), &json!(1)).is_err());
    }

    #[test]
    fn test_long_values_are_truncated() {
        let long = "x".repeat(200);
        let err = validate(&json!({"type": "integer"}), &json!(long)).unwrap_err();
        assert!(err.message.contains('…'));
        assert!(err.message.len() < 150);
    }
}
