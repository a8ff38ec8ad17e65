//! # Schema Nodes
//!
//! A schema document is parsed once into a tree of [`SchemaNode`]s. Each
//! node is a list of [`Keyword`]s, one per keyword group present in the
//! source object. A node may carry several groups at once (a `type` plus a
//! `oneOf`, say) and the validator checks every applicable group.
//!
//! Keywords are stored in evaluation order: `$ref`, combinators, `enum`,
//! `const`, `type`, then the type-specific rule groups. Malformed keyword
//! values (a string `minLength`, a non-array `required`) are ignored the way
//! an absent keyword would be.

use regex::Regex;
use serde_json::{Map, Value};

use assay_core::JsonKind;

/// One parsed schema fragment.
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    keywords: Vec<Keyword>,
}

/// A keyword group. Adding support for a new keyword means adding a
/// variant here, which the validator must then handle exhaustively.
#[derive(Debug, Clone)]
pub enum Keyword {
    /// `$ref` pointer into the root document.
    Ref(String),
    /// `oneOf` / `anyOf` / `allOf`.
    Combinator(Combinator),
    /// `enum`.
    Enum(Vec<Value>),
    /// `const`.
    Const(Value),
    /// `type`, single name or list.
    Type(Vec<TypeName>),
    /// `minLength`, `maxLength`, `pattern`, `format`.
    String(StringRules),
    /// `minimum`, `maximum`, `exclusiveMinimum`, `exclusiveMaximum`, `multipleOf`.
    Number(NumberRules),
    /// `required`, `properties`, `additionalProperties`, `patternProperties`,
    /// `minProperties`, `maxProperties`.
    Object(ObjectRules),
    /// `items`, `additionalItems`, `minItems`, `maxItems`, `uniqueItems`, `contains`.
    Array(ArrayRules),
    /// The boolean schema `false`.
    Never,
}

/// A name accepted by the `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
    /// A name outside the JSON Schema vocabulary. Never matches.
    Other(String),
}

impl TypeName {
    fn parse(name: &str) -> Self {
        match name {
            "string" => TypeName::String,
            "number" => TypeName::Number,
            "integer" => TypeName::Integer,
            "boolean" => TypeName::Boolean,
            "object" => TypeName::Object,
            "array" => TypeName::Array,
            "null" => TypeName::Null,
            other => TypeName::Other(other.to_string()),
        }
    }

    /// Whether a runtime kind satisfies this name. `integer` matches every
    /// number; integrality is enforced by the number checker.
    pub fn matches(&self, kind: JsonKind) -> bool {
        matches!(
            (self, kind),
            (TypeName::String, JsonKind::String)
                | (TypeName::Number, JsonKind::Number)
                | (TypeName::Integer, JsonKind::Number)
                | (TypeName::Boolean, JsonKind::Boolean)
                | (TypeName::Object, JsonKind::Object)
                | (TypeName::Array, JsonKind::Array)
                | (TypeName::Null, JsonKind::Null)
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeName::String => "string",
            TypeName::Number => "number",
            TypeName::Integer => "integer",
            TypeName::Boolean => "boolean",
            TypeName::Object => "object",
            TypeName::Array => "array",
            TypeName::Null => "null",
            TypeName::Other(name) => name,
        }
    }
}

/// Combinator operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    OneOf,
    AnyOf,
    AllOf,
}

impl CombinatorKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            CombinatorKind::OneOf => "oneOf",
            CombinatorKind::AnyOf => "anyOf",
            CombinatorKind::AllOf => "allOf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Combinator {
    pub kind: CombinatorKind,
    pub branches: Vec<SchemaNode>,
}

/// A regular expression from the schema, compiled once. An invalid source
/// is kept so the validator can report it at the offending node.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: Result<Regex, String>,
}

impl Pattern {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            compiled: Regex::new(source).map_err(|e| e.to_string()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> Result<&Regex, &str> {
        self.compiled.as_ref().map_err(|e| e.as_str())
    }

    /// `Some(matched)` for a valid pattern, `None` for an invalid one.
    pub fn is_match(&self, text: &str) -> Option<bool> {
        self.compiled.as_ref().ok().map(|re| re.is_match(text))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    pub format: Option<String>,
}

/// `exclusiveMinimum` / `exclusiveMaximum` in either draft form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exclusive {
    /// Legacy form: modifies the paired `minimum` / `maximum`.
    Flag(bool),
    /// Modern form: the bound itself.
    Limit(f64),
}

#[derive(Debug, Clone, Default)]
pub struct NumberRules {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<Exclusive>,
    pub exclusive_maximum: Option<Exclusive>,
    pub multiple_of: Option<f64>,
}

/// `additionalProperties` / `additionalItems`.
#[derive(Debug, Clone)]
pub enum Additional {
    Forbidden,
    Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone, Default)]
pub struct ObjectRules {
    pub required: Vec<String>,
    pub properties: Vec<(String, SchemaNode)>,
    pub additional_properties: Option<Additional>,
    pub pattern_properties: Vec<(Pattern, SchemaNode)>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
}

impl ObjectRules {
    pub fn declares(&self, key: &str) -> bool {
        self.properties.iter().any(|(name, _)| name == key)
    }

    /// Object checks run without an explicit `type` when these are present.
    pub fn implies_object(&self) -> bool {
        !self.properties.is_empty() || self.additional_properties.is_some()
    }
}

#[derive(Debug, Clone)]
pub enum Items {
    /// One schema applied to every element.
    Every(Box<SchemaNode>),
    /// Positional schemas.
    Tuple(Vec<SchemaNode>),
}

#[derive(Debug, Clone, Default)]
pub struct ArrayRules {
    pub items: Option<Items>,
    pub additional_items: Option<Additional>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
    pub contains: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// Parse a schema fragment. Booleans are boolean schemas; any other
    /// non-object value is treated as the permissive empty schema.
    pub fn parse(value: &Value) -> Self {
        match value {
            Value::Bool(true) => SchemaNode::default(),
            Value::Bool(false) => SchemaNode {
                keywords: vec![Keyword::Never],
            },
            Value::Object(map) => parse_object(map),
            other => {
                tracing::debug!(value = %other, "non-object schema treated as empty");
                SchemaNode::default()
            }
        }
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn reference(&self) -> Option<&str> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Ref(r) => Some(r.as_str()),
            _ => None,
        })
    }

    pub fn types(&self) -> Option<&[TypeName]> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Type(t) => Some(t.as_slice()),
            _ => None,
        })
    }

    pub fn string_rules(&self) -> Option<&StringRules> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::String(r) => Some(r),
            _ => None,
        })
    }

    pub fn number_rules(&self) -> Option<&NumberRules> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Number(r) => Some(r),
            _ => None,
        })
    }

    pub fn object_rules(&self) -> Option<&ObjectRules> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Object(r) => Some(r),
            _ => None,
        })
    }

    pub fn array_rules(&self) -> Option<&ArrayRules> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Array(r) => Some(r),
            _ => None,
        })
    }

    /// Direct sub-schemas of this node, in keyword order.
    pub fn children(&self) -> Vec<&SchemaNode> {
        let mut out = Vec::new();
        for keyword in &self.keywords {
            match keyword {
                Keyword::Combinator(c) => out.extend(c.branches.iter()),
                Keyword::Object(rules) => {
                    out.extend(rules.properties.iter().map(|(_, n)| n));
                    if let Some(Additional::Schema(n)) = &rules.additional_properties {
                        out.push(n);
                    }
                    out.extend(rules.pattern_properties.iter().map(|(_, n)| n));
                }
                Keyword::Array(rules) => {
                    match &rules.items {
                        Some(Items::Every(n)) => out.push(n),
                        Some(Items::Tuple(list)) => out.extend(list.iter()),
                        None => {}
                    }
                    if let Some(Additional::Schema(n)) = &rules.additional_items {
                        out.push(n);
                    }
                    if let Some(n) = &rules.contains {
                        out.push(n);
                    }
                }
                Keyword::Ref(_)
                | Keyword::Enum(_)
                | Keyword::Const(_)
                | Keyword::Type(_)
                | Keyword::String(_)
                | Keyword::Number(_)
                | Keyword::Never => {}
            }
        }
        out
    }
}

fn parse_object(map: &Map<String, Value>) -> SchemaNode {
    let mut keywords = Vec::new();

    if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
        keywords.push(Keyword::Ref(reference.to_string()));
    }

    for kind in [
        CombinatorKind::OneOf,
        CombinatorKind::AnyOf,
        CombinatorKind::AllOf,
    ] {
        if let Some(list) = map.get(kind.keyword()).and_then(Value::as_array) {
            keywords.push(Keyword::Combinator(Combinator {
                kind,
                branches: list.iter().map(SchemaNode::parse).collect(),
            }));
        }
    }

    if let Some(list) = map.get("enum").and_then(Value::as_array) {
        keywords.push(Keyword::Enum(list.clone()));
    }

    if let Some(value) = map.get("const") {
        keywords.push(Keyword::Const(value.clone()));
    }

    match map.get("type") {
        Some(Value::String(name)) => keywords.push(Keyword::Type(vec![TypeName::parse(name)])),
        Some(Value::Array(names)) => keywords.push(Keyword::Type(
            names
                .iter()
                .filter_map(Value::as_str)
                .map(TypeName::parse)
                .collect(),
        )),
        Some(other) => tracing::debug!(value = %other, "ignoring malformed type keyword"),
        None => {}
    }

    if let Some(rules) = parse_string_rules(map) {
        keywords.push(Keyword::String(rules));
    }
    if let Some(rules) = parse_number_rules(map) {
        keywords.push(Keyword::Number(rules));
    }
    if let Some(rules) = parse_object_rules(map) {
        keywords.push(Keyword::Object(rules));
    }
    if let Some(rules) = parse_array_rules(map) {
        keywords.push(Keyword::Array(rules));
    }

    SchemaNode { keywords }
}

fn get_usize(map: &Map<String, Value>, key: &str) -> Option<usize> {
    map.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

fn get_f64(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

fn parse_string_rules(map: &Map<String, Value>) -> Option<StringRules> {
    let rules = StringRules {
        min_length: get_usize(map, "minLength"),
        max_length: get_usize(map, "maxLength"),
        pattern: map.get("pattern").and_then(Value::as_str).map(Pattern::new),
        format: map.get("format").and_then(Value::as_str).map(str::to_string),
    };
    let present = rules.min_length.is_some()
        || rules.max_length.is_some()
        || rules.pattern.is_some()
        || rules.format.is_some();
    present.then_some(rules)
}

fn parse_exclusive(map: &Map<String, Value>, key: &str) -> Option<Exclusive> {
    match map.get(key)? {
        Value::Bool(flag) => Some(Exclusive::Flag(*flag)),
        Value::Number(n) => n.as_f64().map(Exclusive::Limit),
        _ => None,
    }
}

fn parse_number_rules(map: &Map<String, Value>) -> Option<NumberRules> {
    let rules = NumberRules {
        minimum: get_f64(map, "minimum"),
        maximum: get_f64(map, "maximum"),
        exclusive_minimum: parse_exclusive(map, "exclusiveMinimum"),
        exclusive_maximum: parse_exclusive(map, "exclusiveMaximum"),
        multiple_of: get_f64(map, "multipleOf"),
    };
    let present = rules.minimum.is_some()
        || rules.maximum.is_some()
        || rules.exclusive_minimum.is_some()
        || rules.exclusive_maximum.is_some()
        || rules.multiple_of.is_some();
    present.then_some(rules)
}

fn parse_additional(value: &Value) -> Additional {
    match value {
        Value::Bool(false) => Additional::Forbidden,
        other => Additional::Schema(Box::new(SchemaNode::parse(other))),
    }
}

fn parse_object_rules(map: &Map<String, Value>) -> Option<ObjectRules> {
    let has_any = [
        "required",
        "properties",
        "additionalProperties",
        "patternProperties",
        "minProperties",
        "maxProperties",
    ]
    .iter()
    .any(|k| map.contains_key(*k));
    if !has_any {
        return None;
    }

    let required = map
        .get("required")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let properties = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(k, v)| (k.clone(), SchemaNode::parse(v)))
                .collect()
        })
        .unwrap_or_default();

    let pattern_properties = map
        .get("patternProperties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(k, v)| (Pattern::new(k), SchemaNode::parse(v)))
                .collect()
        })
        .unwrap_or_default();

    Some(ObjectRules {
        required,
        properties,
        additional_properties: map.get("additionalProperties").map(parse_additional),
        pattern_properties,
        min_properties: get_usize(map, "minProperties"),
        max_properties: get_usize(map, "maxProperties"),
    })
}

fn parse_array_rules(map: &Map<String, Value>) -> Option<ArrayRules> {
    let has_any = [
        "items",
        "additionalItems",
        "minItems",
        "maxItems",
        "uniqueItems",
        "contains",
    ]
    .iter()
    .any(|k| map.contains_key(*k));
    if !has_any {
        return None;
    }

    let items = map.get("items").map(|items| match items {
        Value::Array(list) => Items::Tuple(list.iter().map(SchemaNode::parse).collect()),
        other => Items::Every(Box::new(SchemaNode::parse(other))),
    });

    Some(ArrayRules {
        items,
        additional_items: map.get("additionalItems").map(parse_additional),
        min_items: get_usize(map, "minItems"),
        max_items: get_usize(map, "maxItems"),
        unique_items: map
            .get("uniqueItems")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        contains: map
            .get("contains")
            .map(|c| Box::new(SchemaNode::parse(c))),
    })
}
