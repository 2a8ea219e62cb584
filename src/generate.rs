//! Mock value generation.
//!
//! One seeded [`StdRng`] per [`generate`] call, threaded through every
//! recursive step by `&mut self`. Same declarations + same config + same
//! seed always yields the same values.
pub mod roots;
pub mod semantics;
mod utility;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::schema::{DeclarationTable, Kind, Property, SchemaDeclaration, TupleElement, TypeNode};

// ------------------------------- Policy ---------------------------------- //

const OPTIONAL_SKIP_PROBABILITY: f64 = 0.3;
const ARRAY_LEN: std::ops::RangeInclusive<usize> = 1..=5;
const SET_LEN: std::ops::RangeInclusive<usize> = 2..=5;
const RECORD_LEN: std::ops::RangeInclusive<usize> = 2..=5;

/// Hard cap on nesting of `generate_value` calls.
const MAX_DEPTH: usize = 32;
/// A declaration already this many times on the active path yields null.
const MAX_REPEAT: usize = 2;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static regex"));

// ------------------------------ Front API --------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub quantity: usize,
    pub seed: Option<u64>,
    /// Explicit root declaration; the selector picks one when absent.
    pub root: Option<String>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self { quantity: 1, seed: None, root: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateOutput {
    pub seed: u64,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("no declarations to generate from")]
    NoDeclarations,
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("root declaration `{0}` not found")]
    UnknownRoot(String),
}

pub fn fresh_seed() -> u64 {
    u64::from(rand::random::<u32>())
}

pub fn generate(declarations: &[SchemaDeclaration], config: &GenerateConfig) -> Result<GenerateOutput, GenerateError> {
    if config.quantity == 0 {
        return Err(GenerateError::InvalidQuantity);
    }
    let table = DeclarationTable::new(declarations);
    let root = match config.root.as_deref() {
        Some(name) => table.get(name).ok_or_else(|| GenerateError::UnknownRoot(name.to_string()))?,
        None => roots::select_root(declarations).ok_or(GenerateError::NoDeclarations)?,
    };
    debug!(root = %root.name, "selected root declaration");

    let seed = config.seed.unwrap_or_else(fresh_seed);
    let mut generator = Generator::new(table, seed);
    let values = (0..config.quantity).map(|_| generator.declaration(root)).collect();
    Ok(GenerateOutput { seed, values })
}

// ------------------------------ Generator --------------------------------- //

pub struct Generator<'a> {
    table: DeclarationTable<'a>,
    rng: StdRng,
    /// Declarations being expanded, outermost first.
    path: Vec<&'a str>,
    depth: usize,
}

impl<'a> Generator<'a> {
    pub fn new(table: DeclarationTable<'a>, seed: u64) -> Self {
        Self { table, rng: StdRng::seed_from_u64(seed), path: Vec::new(), depth: 0 }
    }

    /// Instantiate a declaration: an alias yields its wrapped type, an
    /// entity yields an object.
    pub fn declaration(&mut self, decl: &'a SchemaDeclaration) -> Value {
        let repeats = self.path.iter().filter(|n| **n == decl.name).count();
        if repeats >= MAX_REPEAT {
            debug!(declaration = %decl.name, "recursion guard: cycle cut with null");
            return Value::Null;
        }
        self.path.push(&decl.name);
        let value = match decl.alias_target() {
            Some(target) => self.generate_value(&decl.name, target),
            None => self.object(&decl.properties),
        };
        self.path.pop();
        value
    }

    pub fn generate_value(&mut self, field_hint: &str, node: &TypeNode) -> Value {
        if self.depth >= MAX_DEPTH {
            debug!(field = field_hint, "recursion guard: depth limit reached");
            return Value::Null;
        }
        self.depth += 1;
        let value = self.generate_kind(field_hint, node);
        self.depth -= 1;
        value
    }

    fn generate_kind(&mut self, field_hint: &str, node: &TypeNode) -> Value {
        let hint = node.type_hint.as_deref().unwrap_or(field_hint);
        match &node.kind {
            Kind::Literal { value } => value.to_json(),
            Kind::Template { pattern } => Value::String(self.template(hint, pattern)),
            Kind::Enum { values } => {
                if values.is_empty() {
                    return Value::Null;
                }
                let pick = self.rng.gen_range(0..values.len());
                values[pick].to_json()
            }
            Kind::Unknown => self.reference(hint, node),
            Kind::Array { element } => {
                let len = self.rng.gen_range(ARRAY_LEN);
                Value::Array((0..len).map(|_| self.generate_value(hint, element)).collect())
            }
            Kind::Tuple { elements } => Value::Array(self.tuple(hint, elements)),
            Kind::Map { key, value } => self.record(hint, key, value, None),
            Kind::Set { element } => {
                let len = self.rng.gen_range(SET_LEN);
                Value::Array((0..len).map(|_| self.generate_value(hint, element)).collect())
            }
            Kind::Utility { tag, args } => self.utility(hint, *tag, args, node),
            Kind::Object { members } => self.object(members),
            Kind::Union { members } => {
                if members.is_empty() {
                    return Value::Null;
                }
                let pick = self.rng.gen_range(0..members.len());
                self.generate_value(hint, &members[pick])
            }
            Kind::Intersection { members } => self.intersection(hint, members),
            Kind::String => Value::String(semantics::choose_string_value(hint, &mut self.rng)),
            Kind::Number => semantics::choose_number_value(hint, &mut self.rng),
            Kind::Boolean => Value::Bool(self.rng.gen_bool(0.5)),
            Kind::Date => Value::String(semantics::date_value(&mut self.rng)),
        }
    }

    fn object(&mut self, members: &IndexMap<String, Property>) -> Value {
        let mut out = Map::new();
        for (name, prop) in members {
            if prop.optional && self.rng.gen_bool(OPTIONAL_SKIP_PROBABILITY) {
                continue;
            }
            let value = self.generate_value(name, &prop.ty);
            out.insert(name.clone(), value);
        }
        Value::Object(out)
    }

    /// Optional elements roll like optional properties; a rest element's
    /// items are spliced in place.
    fn tuple(&mut self, hint: &str, elements: &[TupleElement]) -> Vec<Value> {
        let mut out = Vec::with_capacity(elements.len());
        for el in elements {
            // only optional or rest elements may follow an optional one
            if el.optional && self.rng.gen_bool(OPTIONAL_SKIP_PROBABILITY) {
                break;
            }
            let value = self.generate_value(el.name.as_deref().unwrap_or(hint), &el.ty);
            match value {
                Value::Array(items) if el.rest => out.extend(items),
                other => out.push(other),
            }
        }
        out
    }

    fn intersection(&mut self, hint: &str, members: &[TypeNode]) -> Value {
        let mut merged: Option<Map<String, Value>> = None;
        let mut first = None;
        for member in members {
            match self.generate_value(hint, member) {
                Value::Object(fields) => merged.get_or_insert_with(Map::new).extend(fields),
                other => {
                    first.get_or_insert(other);
                }
            }
        }
        match (merged, first) {
            (Some(fields), _) => Value::Object(fields),
            (None, Some(value)) => value,
            (None, None) => Value::Null,
        }
    }

    /// Forward reference: look the name up in the declaration table.
    fn reference(&mut self, hint: &str, node: &TypeNode) -> Value {
        if let Some(decl) = self.table.get(&node.name) {
            return self.declaration(decl);
        }
        match node.name.as_str() {
            "any" | "unknown" => Value::String(semantics::choose_string_value(hint, &mut self.rng)),
            "object" => Value::Object(Map::new()),
            "bigint" => semantics::choose_number_value(hint, &mut self.rng),
            "never" | "symbol" => Value::Null,
            name => {
                warn!(symbol = name, field = hint, "unresolved type reference, emitting null");
                Value::Null
            }
        }
    }

    /// `${..}` placeholders are filled in; literal text between them is kept.
    fn template(&mut self, hint: &str, pattern: &str) -> String {
        let mut out = String::new();
        for segment in split_template(pattern) {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(body) => {
                    let value = self.placeholder(hint, body.trim());
                    out.push_str(&stringify(&value));
                }
            }
        }
        out
    }

    fn placeholder(&mut self, hint: &str, body: &str) -> Value {
        if IDENTIFIER.is_match(body) {
            let lowered = body.to_ascii_lowercase();
            if let Some(node) = TypeNode::primitive(&lowered) {
                return self.generate_value(hint, &node);
            }
            return self.generate_value(body, &TypeNode::unknown(body));
        }
        match crate::parser::parse_type_expr(body) {
            Ok(node) => self.generate_value(hint, &node),
            Err(error) => {
                debug!(placeholder = body, %error, "template placeholder kept verbatim");
                Value::String(format!("${{{body}}}"))
            }
        }
    }

    /// Shared by `Record<K, V>`, index signatures and `Map<K, V>`.
    fn record(&mut self, hint: &str, key: &TypeNode, value: &TypeNode, key_hint: Option<&str>) -> Value {
        let key_hint = key.own_hint().or(key_hint).unwrap_or("key").to_string();
        let value_hint = if value.is_primitive() {
            hint.to_string()
        } else {
            value.own_hint().unwrap_or(hint).to_string()
        };
        let mut out = Map::new();
        if let Some(keys) = self.finite_keys(key) {
            for name in keys {
                let generated = self.generate_value(&value_hint, value);
                out.insert(name, generated);
            }
            return Value::Object(out);
        }
        let len = self.rng.gen_range(RECORD_LEN);
        for slot in 0..len {
            let key = match self.generate_value(&key_hint, key) {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => format!("{key_hint}{slot}"),
            };
            let value = self.generate_value(&value_hint, value);
            out.insert(key, value);
        }
        Value::Object(out)
    }
}

enum Segment<'p> {
    Text(&'p str),
    Placeholder(&'p str),
}

/// Splits on `${..}`, honoring nested braces inside a placeholder.
fn split_template(pattern: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = pattern;
    while let Some(start) = rest.find("${") {
        let body_start = start + 2;
        let mut depth = 1usize;
        let mut end = None;
        for (i, c) in rest[body_start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(body_start + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(end) = end else { break };
        if start > 0 {
            segments.push(Segment::Text(&rest[..start]));
        }
        segments.push(Segment::Placeholder(&rest[body_start..end]));
        rest = &rest[end + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    segments
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

// ------------------------------- Tests ------------------------------------ //
