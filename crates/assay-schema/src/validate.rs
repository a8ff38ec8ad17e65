//! # Schema Validation
//!
//! Runtime validation of parsed JSON values against a compiled schema.
//!
//! ## Accumulation Invariant
//!
//! Validation never fails and never stops early within a node. Every
//! independent violation at every schema node surfaces in one
//! [`ValidationResult`], each with the instance path, the schema path, the
//! offending value and a human-readable message.
//!
//! ## Evaluation Order
//!
//! At each node, after `$ref` resolution:
//!
//! 1. `null` short-circuits when the node declares `type`. A node without
//!    `type` lets `null` reach `enum`, `const` and the combinators, so the
//!    `anyOf: [{type: null}, ...]` nullable pattern keeps working.
//! 2. Combinators run, independently of the type checks below. A value can
//!    therefore fail both `type` and `oneOf` for the same underlying cause;
//!    both errors are reported.
//! 3. `enum`, then `const`.
//! 4. `type` dispatch to the string / number / object / array checker.
//! 5. Without `type`, object and array checks still run when the node
//!    carries `properties`/`additionalProperties` or `items`.
//!
//! Each check is a pure function returning its own error list; callers merge
//! explicitly. `oneOf`, `anyOf` and `contains` inspect branch results in
//! isolation, while `allOf` merges branch errors into the node's list.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use assay_core::path::{display_path, schema_child, SCHEMA_ROOT};
use assay_core::{json_contains, json_equal, JsonKind};

use crate::error::SchemaError;
use crate::node::{Combinator, CombinatorKind, Keyword, SchemaNode, TypeName};
use crate::resolve::ValidationContext;

/// Tunables for a compiled schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorOptions {
    /// Maximum number of combinator hops taken on one value before
    /// descending into a property or item. Bounds schemas that recurse
    /// through `$ref` without consuming input; document nesting is free.
    pub max_depth: usize,
    /// Whether `format` is enforced.
    pub check_formats: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_depth: 128,
            check_formats: true,
        }
    }
}

/// A single violation with structured context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Dot/`[index]` path to the violating value; empty at the root.
    pub path: String,
    /// Human-readable description.
    pub message: String,
    /// The offending value (`null` when the value is absent).
    pub value: Value,
    /// Slash-delimited path to the schema keyword, rooted at `#`.
    pub schema_path: String,
}

impl ValidationError {
    pub fn new(
        path: &str,
        message: impl Into<String>,
        value: &Value,
        schema_path: impl Into<String>,
    ) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
            value: value.clone(),
            schema_path: schema_path.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  {}: {} [{}]",
            display_path(&self.path),
            self.message,
            self.schema_path
        )
    }
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Violations at one instance path.
    pub fn errors_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.path == path)
    }

    /// Turn a failed result into an error, for callers that fail an
    /// assertion with `?`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ValidationFailed` carrying this result when it
    /// holds any violation.
    pub fn into_result(self) -> Result<(), SchemaError> {
        if self.valid {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed(self))
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// A schema document parsed once and validated against many times.
///
/// ## Thread Safety
///
/// `CompiledSchema` is `Send + Sync` and never mutated after compilation,
/// so one instance can be shared across concurrent test iterations.
#[derive(Debug)]
pub struct CompiledSchema {
    context: ValidationContext,
    options: ValidatorOptions,
}

impl CompiledSchema {
    /// Compile schema text with default options.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` if the text is not JSON, and the
    /// reference errors of [`ValidationContext::new`].
    pub fn compile(text: &str) -> Result<Self, SchemaError> {
        Self::compile_with(text, ValidatorOptions::default())
    }

    /// Compile schema text with explicit options.
    pub fn compile_with(text: &str, options: ValidatorOptions) -> Result<Self, SchemaError> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value_with(document, options)
    }

    /// Compile an already-parsed schema document with default options.
    pub fn from_value(document: Value) -> Result<Self, SchemaError> {
        Self::from_value_with(document, ValidatorOptions::default())
    }

    /// Compile an already-parsed schema document with explicit options.
    pub fn from_value_with(document: Value, options: ValidatorOptions) -> Result<Self, SchemaError> {
        let context = ValidationContext::new(document)?;
        Ok(Self { context, options })
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validate a value, collecting every violation.
    pub fn validate(&self, value: &Value) -> ValidationResult {
        let walker = Walker {
            context: &self.context,
            options: &self.options,
        };
        let errors = walker.check(self.context.root(), value, "", SCHEMA_ROOT, 0);
        ValidationResult::from_errors(errors)
    }

    /// Validate a value that may be absent. An absent value is always one
    /// "undefined" violation at the root.
    pub fn validate_option(&self, value: Option<&Value>) -> ValidationResult {
        match value {
            Some(value) => self.validate(value),
            None => ValidationResult::from_errors(vec![ValidationError::new(
                "",
                "Value is undefined",
                &Value::Null,
                SCHEMA_ROOT,
            )]),
        }
    }

    /// Shorthand for `validate(value).valid`.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).valid
    }
}

/// One validation pass over a compiled schema.
pub(crate) struct Walker<'a> {
    pub(crate) context: &'a ValidationContext,
    pub(crate) options: &'a ValidatorOptions,
}

impl<'a> Walker<'a> {
    /// Check `value` against `node`, returning the violations found.
    pub(crate) fn check(
        &self,
        node: &SchemaNode,
        value: &Value,
        path: &str,
        schema_path: &str,
        depth: usize,
    ) -> Vec<ValidationError> {
        if depth > self.options.max_depth {
            tracing::warn!(
                path,
                schema_path,
                max_depth = self.options.max_depth,
                "validation depth bound reached"
            );
            return vec![ValidationError::new(
                path,
                format!("Maximum validation depth {} exceeded", self.options.max_depth),
                value,
                schema_path,
            )];
        }

        let node = match self.context.resolve(node) {
            Ok(node) => node,
            Err(e) => return vec![ValidationError::new(path, e.to_string(), value, schema_path)],
        };

        let mut errors = Vec::new();

        if value.is_null() {
            if let Some(types) = node.types() {
                if !types.iter().any(|t| t.matches(JsonKind::Null)) {
                    errors.push(type_mismatch(types, value, path, schema_path));
                }
                return errors;
            }
        }

        let kind = JsonKind::of(value);
        for keyword in node.keywords() {
            match keyword {
                // Resolved above.
                Keyword::Ref(_) => {}
                Keyword::Combinator(combinator) => {
                    errors.extend(self.check_combinator(combinator, value, path, schema_path, depth));
                }
                Keyword::Enum(allowed) => {
                    if !json_contains(allowed, value) {
                        errors.push(ValidationError::new(
                            path,
                            format!(
                                "Value must be one of: {}",
                                Value::Array(allowed.clone())
                            ),
                            value,
                            schema_child(schema_path, &["enum"]),
                        ));
                    }
                }
                Keyword::Const(expected) => {
                    if !json_equal(expected, value) {
                        errors.push(ValidationError::new(
                            path,
                            format!("Value must be equal to constant {expected}"),
                            value,
                            schema_child(schema_path, &["const"]),
                        ));
                    }
                }
                Keyword::Type(types) => {
                    errors.extend(self.check_type(node, types, value, path, schema_path));
                }
                Keyword::Object(rules) => {
                    if node.types().is_none() && rules.implies_object() {
                        if let Value::Object(map) = value {
                            errors.extend(self.check_object(rules, map, path, schema_path));
                        }
                    }
                }
                Keyword::Array(rules) => {
                    if node.types().is_none() && rules.items.is_some() {
                        if let Value::Array(items) = value {
                            errors.extend(self.check_array(rules, items, path, schema_path));
                        }
                    }
                }
                // Only reachable through `type` dispatch.
                Keyword::String(_) | Keyword::Number(_) => {}
                Keyword::Never => errors.push(ValidationError::new(
                    path,
                    format!("No value is allowed here (got {kind})"),
                    value,
                    schema_path,
                )),
            }
        }

        errors
    }

    fn check_type(
        &self,
        node: &SchemaNode,
        types: &[TypeName],
        value: &Value,
        path: &str,
        schema_path: &str,
    ) -> Vec<ValidationError> {
        let kind = JsonKind::of(value);
        // A fractional number goes to `number` when both are declared.
        let skip_integer = types.contains(&TypeName::Number)
            && value.as_f64().is_some_and(|n| n.fract() != 0.0);
        let Some(matched) = types
            .iter()
            .find(|t| t.matches(kind) && !(skip_integer && **t == TypeName::Integer))
        else {
            return vec![type_mismatch(types, value, path, schema_path)];
        };

        match (matched, value) {
            (TypeName::String, Value::String(text)) => node
                .string_rules()
                .map(|rules| self.check_string(rules, text, value, path, schema_path))
                .unwrap_or_default(),
            (TypeName::Number | TypeName::Integer, Value::Number(_)) => self.check_number(
                node.number_rules(),
                *matched == TypeName::Integer,
                value,
                path,
                schema_path,
            ),
            (TypeName::Object, Value::Object(map)) => node
                .object_rules()
                .map(|rules| self.check_object(rules, map, path, schema_path))
                .unwrap_or_default(),
            (TypeName::Array, Value::Array(items)) => node
                .array_rules()
                .map(|rules| self.check_array(rules, items, path, schema_path))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn check_combinator(
        &self,
        combinator: &Combinator,
        value: &Value,
        path: &str,
        schema_path: &str,
        depth: usize,
    ) -> Vec<ValidationError> {
        let keyword = combinator.kind.keyword();
        let branch_path = |i: usize| schema_child(schema_path, &[keyword, &i.to_string()]);

        match combinator.kind {
            CombinatorKind::OneOf => {
                let matched = combinator
                    .branches
                    .iter()
                    .enumerate()
                    .filter(|(i, branch)| {
                        self.check(branch, value, path, &branch_path(*i), depth + 1)
                            .is_empty()
                    })
                    .count();
                if matched == 1 {
                    Vec::new()
                } else {
                    vec![ValidationError::new(
                        path,
                        format!("Expected exactly one schema to match, but {matched} matched"),
                        value,
                        schema_child(schema_path, &[keyword]),
                    )]
                }
            }
            CombinatorKind::AnyOf => {
                let any = combinator.branches.iter().enumerate().any(|(i, branch)| {
                    self.check(branch, value, path, &branch_path(i), depth + 1)
                        .is_empty()
                });
                if any {
                    Vec::new()
                } else {
                    vec![ValidationError::new(
                        path,
                        "Expected at least one schema to match, but none matched",
                        value,
                        schema_child(schema_path, &[keyword]),
                    )]
                }
            }
            CombinatorKind::AllOf => combinator
                .branches
                .iter()
                .enumerate()
                .flat_map(|(i, branch)| self.check(branch, value, path, &branch_path(i), depth + 1))
                .collect(),
        }
    }
}

fn type_mismatch(types: &[TypeName], value: &Value, path: &str, schema_path: &str) -> ValidationError {
    let expected: Vec<&str> = types.iter().map(TypeName::as_str).collect();
    ValidationError::new(
        path,
        format!(
            "Expected type {}, got {}",
            expected.join(" or "),
            JsonKind::of(value)
        ),
        value,
        schema_child(schema_path, &["type"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(schema: Value) -> CompiledSchema {
        CompiledSchema::from_value(schema).expect("schema should compile")
    }

    #[test]
    fn test_compile_rejects_invalid_json() {
        let err = CompiledSchema::compile("{not json").unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }

    #[test]
    fn test_valid_value_has_no_errors() {
        let schema = compile(json!({
            "type": "object",
            "required": ["id"],
            "properties": {"id": {"type": "integer", "minimum": 1}}
        }));
        let result = schema.validate(&json!({"id": 7}));
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_null_short_circuits_when_type_declared() {
        let schema = compile(json!({"type": "string", "enum": ["a"], "minLength": 3}));
        let result = schema.validate(&json!(null));
        assert_eq!(result.len(), 1);
        assert_eq!(result.errors[0].message, "Expected type string, got null");
        assert_eq!(result.errors[0].schema_path, "#/type");

        let nullable = compile(json!({"type": ["string", "null"], "oneOf": [{"type": "string"}]}));
        assert!(nullable.is_valid(&json!(null)));
    }

    #[test]
    fn test_null_without_type_reaches_enum() {
        let schema = compile(json!({"enum": ["a", "b"]}));
        let result = schema.validate(&json!(null));
        assert_eq!(result.len(), 1);
        assert!(result.errors[0].message.starts_with("Value must be one of"));
    }

    #[test]
    fn test_undefined_value() {
        let schema = compile(json!({}));
        let result = schema.validate_option(None);
        assert!(!result.valid);
        assert_eq!(result.errors[0].message, "Value is undefined");
        assert!(schema.validate_option(Some(&json!(1))).valid);
    }

    #[test]
    fn test_type_mismatch_names_array() {
        let schema = compile(json!({"type": ["object", "string"]}));
        let result = schema.validate(&json!([1]));
        assert_eq!(result.errors[0].message, "Expected type object or string, got array");
    }

    #[test]
    fn test_one_of_exactly_one() {
        let schema = compile(json!({"oneOf": [{"type": "string"}, {"type": "number"}]}));
        assert!(schema.is_valid(&json!("x")));
        let neither = schema.validate(&json!(true));
        assert_eq!(neither.len(), 1);
        assert_eq!(
            neither.errors[0].message,
            "Expected exactly one schema to match, but 0 matched"
        );
        assert_eq!(neither.errors[0].schema_path, "#/oneOf");
    }

    #[test]
    fn test_one_of_both_match() {
        let schema = compile(json!({"oneOf": [{"type": "number"}, {"minimum": 0}]}));
        let both = schema.validate(&json!(5));
        assert_eq!(both.len(), 1);
        assert!(both.errors[0].message.contains("2 matched"));
    }

    #[test]
    fn test_any_of() {
        let schema = compile(json!({"anyOf": [{"type": "string"}, {"type": "null"}]}));
        assert!(schema.is_valid(&json!(null)));
        assert!(schema.is_valid(&json!("s")));
        let result = schema.validate(&json!(3));
        assert_eq!(result.len(), 1);
        assert_eq!(result.errors[0].schema_path, "#/anyOf");
    }

    #[test]
    fn test_all_of_errors_surface_directly() {
        let schema = compile(json!({
            "allOf": [
                {"type": "string", "minLength": 5},
                {"pattern": "^[a-z]+$"}
            ]
        }));
        let result = schema.validate(&json!("AB"));
        // String rules without `type` never run, so branch 1 is silent.
        assert_eq!(result.len(), 1);
        assert_eq!(result.errors[0].schema_path, "#/allOf/0/minLength");
    }

    #[test]
    fn test_combinator_and_type_both_reported() {
        let schema = compile(json!({
            "type": "string",
            "oneOf": [{"type": "string", "minLength": 1}]
        }));
        let result = schema.validate(&json!(42));
        assert_eq!(result.len(), 2);
        assert_eq!(result.errors[0].schema_path, "#/oneOf");
        assert_eq!(result.errors[1].schema_path, "#/type");
    }

    #[test]
    fn test_const_and_enum_numeric_equality() {
        let schema = compile(json!({"const": 1}));
        assert!(schema.is_valid(&json!(1.0)));
        assert!(!schema.is_valid(&json!(2)));

        let schema = compile(json!({"enum": [{"a": 1}, "x"]}));
        assert!(schema.is_valid(&json!({"a": 1.0})));
        let result = schema.validate(&json!("y"));
        assert_eq!(result.errors[0].message, r#"Value must be one of: [{"a":1},"x"]"#);
    }

    #[test]
    fn test_false_schema() {
        let schema = compile(json!(false));
        let result = schema.validate(&json!({}));
        assert_eq!(result.len(), 1);
        assert!(result.errors[0].message.contains("No value is allowed"));
        assert!(compile(json!(true)).is_valid(&json!({"anything": [1, 2]})));
    }

    #[test]
    fn test_ref_behaves_like_inlined_definition() {
        let by_ref = compile(json!({
            "type": "object",
            "properties": {"user": {"$ref": "#/definitions/User"}},
            "definitions": {
                "User": {"$ref": "#/definitions/Named"},
                "Named": {"type": "object", "required": ["name"]}
            }
        }));
        let inlined = compile(json!({
            "type": "object",
            "properties": {"user": {"type": "object", "required": ["name"]}}
        }));
        for value in [json!({"user": {}}), json!({"user": {"name": "x"}}), json!({"user": 3})] {
            let a = by_ref.validate(&value);
            let b = inlined.validate(&value);
            assert_eq!(a.valid, b.valid);
            let a_msgs: Vec<_> = a.errors.iter().map(|e| (&e.path, &e.message)).collect();
            let b_msgs: Vec<_> = b.errors.iter().map(|e| (&e.path, &e.message)).collect();
            assert_eq!(a_msgs, b_msgs);
        }
    }

    #[test]
    fn test_depth_bound_stops_self_recursion() {
        let schema = CompiledSchema::from_value_with(
            json!({"allOf": [{"$ref": "#"}]}),
            ValidatorOptions {
                max_depth: 8,
                check_formats: true,
            },
        )
        .unwrap();
        let result = schema.validate(&json!(1));
        assert_eq!(result.len(), 1);
        assert_eq!(result.errors[0].message, "Maximum validation depth 8 exceeded");
    }

    #[test]
    fn test_deep_recursive_document_within_bound() {
        let schema = compile(json!({
            "$ref": "#/definitions/Node",
            "definitions": {
                "Node": {
                    "allOf": [{"type": "object"}],
                    "properties": {"c": {"allOf": [{"$ref": "#/definitions/Node"}]}}
                }
            }
        }));
        let mut doc = json!({});
        for _ in 0..100 {
            doc = json!({ "c": doc });
        }
        let result = schema.validate(&doc);
        assert!(result.valid, "{result}");
    }

    #[test]
    fn test_integer_number_union_accepts_fraction() {
        let schema = compile(json!({"type": ["integer", "number"]}));
        assert!(schema.is_valid(&json!(1.5)));
        assert!(schema.is_valid(&json!(2)));

        let reversed = compile(json!({"type": ["number", "integer"], "maximum": 1}));
        let result = reversed.validate(&json!(1.5));
        assert_eq!(result.len(), 1);
        assert_eq!(result.errors[0].schema_path, "#/maximum");
    }

    #[test]
    fn test_integer_without_number_still_requires_integral() {
        let schema = compile(json!({"type": ["integer", "string"]}));
        let result = schema.validate(&json!(2.5));
        assert_eq!(result.len(), 1);
        assert_eq!(result.errors[0].message, "Expected integer, got 2.5");
        assert!(schema.is_valid(&json!("2.5")));
    }

    #[test]
    fn test_into_result() {
        let schema = compile(json!({"type": "string"}));
        assert!(schema.validate(&json!("ok")).into_result().is_ok());
        let err = schema.validate(&json!(1)).into_result().unwrap_err();
        assert!(err.to_string().contains("Expected type string, got number"));
    }

    #[test]
    fn test_error_serializes_schema_path_camel_case() {
        let schema = compile(json!({"type": "string"}));
        let result = schema.validate(&json!(1));
        let encoded = serde_json::to_value(&result.errors[0]).unwrap();
        assert_eq!(encoded["schemaPath"], "#/type");
        assert_eq!(encoded["path"], "");
        assert_eq!(encoded["value"], 1);
    }

    #[test]
    fn test_display_report() {
        let schema = compile(json!({"type": "object", "required": ["a", "b"]}));
        let result = schema.validate(&json!({}));
        let report = result.to_string();
        assert!(report.contains("a: Missing required property: a [#/required]"));
        assert_eq!(report.lines().count(), 2);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ValidatorOptions = serde_json::from_value(json!({"max_depth": 10})).unwrap();
        assert_eq!(options.max_depth, 10);
        assert!(options.check_formats);
        assert!(serde_json::from_value::<ValidatorOptions>(json!({"bogus": 1})).is_err());
    }

    #[test]
    fn test_compiled_schema_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledSchema>();
    }
}
