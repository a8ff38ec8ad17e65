//! Type-specific checkers: string, number, object and array keywords.
//!
//! These only run once `type` dispatch (or object/array inference) has
//! picked them, so each receives an already-destructured value.

use std::collections::HashMap;

use serde_json::{Map, Value};

use assay_core::path::{child_index, child_key, schema_child};
use assay_core::CanonicalText;

use crate::format::check_format;
use crate::node::{Additional, ArrayRules, Exclusive, Items, NumberRules, ObjectRules, StringRules};
use crate::validate::{ValidationError, Walker};

impl<'a> Walker<'a> {
    pub(crate) fn check_string(
        &self,
        rules: &StringRules,
        text: &str,
        value: &Value,
        path: &str,
        schema_path: &str,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        // Lengths count UTF-16 code units.
        let length = text.encode_utf16().count();

        if let Some(min) = rules.min_length {
            if length < min {
                errors.push(ValidationError::new(
                    path,
                    format!("String length {length} is less than minLength {min}"),
                    value,
                    schema_child(schema_path, &["minLength"]),
                ));
            }
        }

        if let Some(max) = rules.max_length {
            if length > max {
                errors.push(ValidationError::new(
                    path,
                    format!("String length {length} exceeds maxLength {max}"),
                    value,
                    schema_child(schema_path, &["maxLength"]),
                ));
            }
        }

        if let Some(pattern) = &rules.pattern {
            let message = match pattern.regex() {
                Ok(re) if re.is_match(text) => None,
                Ok(_) => Some(format!("String does not match pattern: {}", pattern.source())),
                Err(reason) => Some(format!("Invalid pattern {}: {reason}", pattern.source())),
            };
            if let Some(message) = message {
                errors.push(ValidationError::new(
                    path,
                    message,
                    value,
                    schema_child(schema_path, &["pattern"]),
                ));
            }
        }

        if let Some(format) = &rules.format {
            if self.options.check_formats && check_format(format, text) == Some(false) {
                errors.push(ValidationError::new(
                    path,
                    format!("Invalid {format} format"),
                    value,
                    schema_child(schema_path, &["format"]),
                ));
            }
        }

        errors
    }

    pub(crate) fn check_number(
        &self,
        rules: Option<&NumberRules>,
        integer: bool,
        value: &Value,
        path: &str,
        schema_path: &str,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let Some(n) = value.as_f64() else {
            return errors;
        };

        if integer && n.fract() != 0.0 {
            errors.push(ValidationError::new(
                path,
                format!("Expected integer, got {value}"),
                value,
                schema_child(schema_path, &["type"]),
            ));
        }

        let Some(rules) = rules else {
            return errors;
        };

        let mut push = |message: String, keyword: &str| {
            errors.push(ValidationError::new(
                path,
                message,
                value,
                schema_child(schema_path, &[keyword]),
            ));
        };

        if let Some(min) = rules.minimum {
            if rules.exclusive_minimum == Some(Exclusive::Flag(true)) {
                if n <= min {
                    push(format!("Value {value} must be greater than {min}"), "exclusiveMinimum");
                }
            } else if n < min {
                push(format!("Value {value} is less than minimum {min}"), "minimum");
            }
        }
        if let Some(Exclusive::Limit(limit)) = rules.exclusive_minimum {
            if n <= limit {
                push(format!("Value {value} must be greater than {limit}"), "exclusiveMinimum");
            }
        }

        if let Some(max) = rules.maximum {
            if rules.exclusive_maximum == Some(Exclusive::Flag(true)) {
                if n >= max {
                    push(format!("Value {value} must be less than {max}"), "exclusiveMaximum");
                }
            } else if n > max {
                push(format!("Value {value} is greater than maximum {max}"), "maximum");
            }
        }
        if let Some(Exclusive::Limit(limit)) = rules.exclusive_maximum {
            if n >= limit {
                push(format!("Value {value} must be less than {limit}"), "exclusiveMaximum");
            }
        }

        // Plain floating-point remainder: 0.3 is not a multiple of 0.1 here.
        if let Some(divisor) = rules.multiple_of {
            if divisor != 0.0 && n % divisor != 0.0 {
                push(format!("Value {value} is not a multiple of {divisor}"), "multipleOf");
            }
        }

        errors
    }

    pub(crate) fn check_object(
        &self,
        rules: &ObjectRules,
        map: &Map<String, Value>,
        path: &str,
        schema_path: &str,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for key in &rules.required {
            if !map.contains_key(key) {
                errors.push(ValidationError::new(
                    &child_key(path, key),
                    format!("Missing required property: {key}"),
                    &Value::Null,
                    schema_child(schema_path, &["required"]),
                ));
            }
        }

        let count = map.len();
        if let Some(min) = rules.min_properties {
            if count < min {
                errors.push(ValidationError::new(
                    path,
                    format!("Object has {count} properties, fewer than minProperties {min}"),
                    &Value::Object(map.clone()),
                    schema_child(schema_path, &["minProperties"]),
                ));
            }
        }
        if let Some(max) = rules.max_properties {
            if count > max {
                errors.push(ValidationError::new(
                    path,
                    format!("Object has {count} properties, more than maxProperties {max}"),
                    &Value::Object(map.clone()),
                    schema_child(schema_path, &["maxProperties"]),
                ));
            }
        }

        for (key, schema) in &rules.properties {
            if let Some(child) = map.get(key) {
                errors.extend(self.check(
                    schema,
                    child,
                    &child_key(path, key),
                    &schema_child(schema_path, &["properties", key]),
                    0,
                ));
            }
        }

        if let Some(additional) = &rules.additional_properties {
            for (key, child) in map {
                if rules.declares(key) {
                    continue;
                }
                let pattern_matched = rules
                    .pattern_properties
                    .iter()
                    .any(|(pattern, _)| pattern.is_match(key) == Some(true));
                if pattern_matched {
                    continue;
                }
                let child_path = child_key(path, key);
                let additional_path = schema_child(schema_path, &["additionalProperties"]);
                match additional {
                    Additional::Forbidden => errors.push(ValidationError::new(
                        &child_path,
                        format!("Additional property not allowed: {key}"),
                        child,
                        additional_path,
                    )),
                    Additional::Schema(schema) => errors.extend(self.check(
                        schema,
                        child,
                        &child_path,
                        &additional_path,
                        0,
                    )),
                }
            }
        }

        for (pattern, schema) in &rules.pattern_properties {
            let pattern_path = schema_child(schema_path, &["patternProperties", pattern.source()]);
            let re = match pattern.regex() {
                Ok(re) => re,
                Err(reason) => {
                    errors.push(ValidationError::new(
                        path,
                        format!("Invalid pattern {}: {reason}", pattern.source()),
                        &Value::Object(map.clone()),
                        pattern_path,
                    ));
                    continue;
                }
            };
            for (key, child) in map {
                if re.is_match(key) {
                    errors.extend(self.check(
                        schema,
                        child,
                        &child_key(path, key),
                        &pattern_path,
                        0,
                    ));
                }
            }
        }

        errors
    }

    pub(crate) fn check_array(
        &self,
        rules: &ArrayRules,
        items: &[Value],
        path: &str,
        schema_path: &str,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let whole = || Value::Array(items.to_vec());
        let len = items.len();

        if let Some(min) = rules.min_items {
            if len < min {
                errors.push(ValidationError::new(
                    path,
                    format!("Array has {len} items, fewer than minItems {min}"),
                    &whole(),
                    schema_child(schema_path, &["minItems"]),
                ));
            }
        }
        if let Some(max) = rules.max_items {
            if len > max {
                errors.push(ValidationError::new(
                    path,
                    format!("Array has {len} items, more than maxItems {max}"),
                    &whole(),
                    schema_child(schema_path, &["maxItems"]),
                ));
            }
        }

        if rules.unique_items {
            let duplicates = duplicate_indices(items);
            if !duplicates.is_empty() {
                let listed: Vec<String> = duplicates.iter().map(usize::to_string).collect();
                errors.push(ValidationError::new(
                    path,
                    format!("Array items are not unique; duplicates at indices: {}", listed.join(", ")),
                    &whole(),
                    schema_child(schema_path, &["uniqueItems"]),
                ));
            }
        }

        match &rules.items {
            Some(Items::Every(schema)) => {
                let items_path = schema_child(schema_path, &["items"]);
                for (i, item) in items.iter().enumerate() {
                    errors.extend(self.check(schema, item, &child_index(path, i), &items_path, 0));
                }
            }
            Some(Items::Tuple(schemas)) => {
                for (i, (item, schema)) in items.iter().zip(schemas).enumerate() {
                    errors.extend(self.check(
                        schema,
                        item,
                        &child_index(path, i),
                        &schema_child(schema_path, &["items", &i.to_string()]),
                        0,
                    ));
                }
                if let Some(additional) = &rules.additional_items {
                    let additional_path = schema_child(schema_path, &["additionalItems"]);
                    for (i, item) in items.iter().enumerate().skip(schemas.len()) {
                        match additional {
                            Additional::Forbidden => errors.push(ValidationError::new(
                                &child_index(path, i),
                                format!("Additional item not allowed at index {i}"),
                                item,
                                additional_path.clone(),
                            )),
                            Additional::Schema(schema) => errors.extend(self.check(
                                schema,
                                item,
                                &child_index(path, i),
                                &additional_path,
                                0,
                            )),
                        }
                    }
                }
            }
            None => {}
        }

        if let Some(schema) = &rules.contains {
            let contains_path = schema_child(schema_path, &["contains"]);
            let found = items.iter().enumerate().any(|(i, item)| {
                self.check(schema, item, &child_index(path, i), &contains_path, 0)
                    .is_empty()
            });
            if !found {
                errors.push(ValidationError::new(
                    path,
                    "No array item matches the contains schema",
                    &whole(),
                    contains_path,
                ));
            }
        }

        errors
    }
}

/// Indices of items whose canonical text was already seen earlier in the
/// array. The first occurrence of each value is not listed.
pub(crate) fn duplicate_indices(items: &[Value]) -> Vec<usize> {
    let mut seen: HashMap<CanonicalText, usize> = HashMap::with_capacity(items.len());
    let mut duplicates = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let text = CanonicalText::new_lossy(item);
        if seen.contains_key(&text) {
            duplicates.push(i);
        } else {
            seen.insert(text, i);
        }
    }
    duplicates
}
