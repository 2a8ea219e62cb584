//! Example data -> declaration source.
//!
//! Samples are observed one at a time and joined into a least-upper-bound
//! [`Shape`]: at most one arm per JSON kind, each carrying only sufficient
//! statistics (field presence counts, numeric range, a capped literal set).
//! Join is associative, commutative and idempotent over arms and types, so
//! sample order never changes what is inferred. Field order is the one
//! exception: fields are listed in order of first appearance. [`emit`] turns
//! the solved shape into interfaces.
pub mod arr;
pub mod emit;
pub mod num;
pub mod obj;
pub mod str;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub use arr::ArrC;
pub use num::NumC;
pub use obj::{FieldC, ObjC};
pub use str::StrC;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferError {
    #[error("malformed example data in {input}: {message}")]
    MalformedExampleData { input: String, message: String },
    #[error("no samples to infer from")]
    NoSamples,
}

// ------------------------------ State ------------------------------------- //

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub null: bool,
    pub boolean: bool,
    pub number: Option<NumC>,
    pub string: Option<StrC>,
    pub array: Option<ArrC>,
    pub object: Option<ObjC>,
}

impl Shape {
    pub fn null() -> Self {
        Self { null: true, ..Self::default() }
    }

    pub fn is_bottom(&self) -> bool {
        self.kinds() == 0 && !self.null
    }

    pub fn is_exact_null(&self) -> bool {
        self.null && self.kinds() == 0
    }

    /// Bitmask of non-null arms.
    pub fn kinds(&self) -> u8 {
        u8::from(self.boolean)
            | u8::from(self.number.is_some()) << 1
            | u8::from(self.string.is_some()) << 2
            | u8::from(self.array.is_some()) << 3
            | u8::from(self.object.is_some()) << 4
    }

    pub fn observe(value: &Value) -> Self {
        match value {
            Value::Null => Self::null(),
            Value::Bool(_) => Self { boolean: true, ..Self::default() },
            Value::Number(n) => Self { number: n.as_f64().map(NumC::point), ..Self::default() },
            Value::String(s) => Self { string: Some(StrC::point(s)), ..Self::default() },
            Value::Array(items) => Self { array: Some(observe_array(items)), ..Self::default() },
            Value::Object(map) => Self { object: Some(observe_object(map)), ..Self::default() },
        }
    }

    pub fn join(a: &Self, b: &Self) -> Self {
        Self {
            null: a.null || b.null,
            boolean: a.boolean || b.boolean,
            number: join_arm(&a.number, &b.number, NumC::join),
            string: join_arm(&a.string, &b.string, StrC::join),
            array: join_arm(&a.array, &b.array, ArrC::join),
            object: join_arm(&a.object, &b.object, ObjC::join),
        }
    }
}

fn join_arm<T: Clone>(a: &Option<T>, b: &Option<T>, join: fn(&T, &T) -> T) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(join(x, y)),
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (None, None) => None,
    }
}

fn observe_array(items: &[Value]) -> ArrC {
    let cols: Vec<Shape> = items.iter().map(Shape::observe).collect();
    let item = cols.iter().fold(Shape::default(), |acc, c| Shape::join(&acc, c));
    ArrC {
        len_min: items.len(),
        len_max: items.len(),
        item: Box::new(item),
        present: vec![1; items.len()],
        non_null: items.iter().map(|v| u64::from(!v.is_null())).collect(),
        cols,
        samples: 1,
    }
}

fn observe_object(map: &Map<String, Value>) -> ObjC {
    let fields = map
        .iter()
        .map(|(name, value)| {
            let field = FieldC { shape: Shape::observe(value), present_in: 1, non_null_in: u64::from(!value.is_null()) };
            (name.clone(), field)
        })
        .collect();
    ObjC { fields, seen: 1 }
}

// ------------------------------ Front API --------------------------------- //

#[derive(Debug, Default)]
pub struct Inference {
    state: Shape,
    samples: usize,
}

impl Inference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_value(&mut self, value: &Value) {
        self.state = Shape::join(&self.state, &Shape::observe(value));
        self.samples += 1;
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn solve(&self) -> &Shape {
        &self.state
    }
}

/// One document, or one per non-blank line with `ndjson`.
pub fn parse_samples(source: &str, text: &str, ndjson: bool) -> Result<Vec<Value>, InferError> {
    let malformed = |line: Option<usize>, error: serde_json::Error| InferError::MalformedExampleData {
        input: match line {
            Some(n) => format!("{source}:{n}"),
            None => source.to_string(),
        },
        message: error.to_string(),
    };
    if !ndjson {
        return serde_json::from_str(text).map(|v| vec![v]).map_err(|e| malformed(None, e));
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| serde_json::from_str(line).map_err(|e| malformed(Some(i + 1), e)))
        .collect()
}

pub fn infer_declarations<'v, I>(samples: I, root_name: &str) -> Result<String, InferError>
where
    I: IntoIterator<Item = &'v Value>,
{
    let mut inference = Inference::new();
    for sample in samples {
        inference.observe_value(sample);
    }
    if inference.samples() == 0 {
        return Err(InferError::NoSamples);
    }
    debug!(samples = inference.samples(), root = root_name, "inferring declarations");
    Ok(emit::emit_declarations(inference.solve(), root_name))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn solve(values: &[Value]) -> Shape {
        let mut inference = Inference::new();
        values.iter().for_each(|v| inference.observe_value(v));
        inference.solve().clone()
    }

    #[test]
    fn presence_counts_track_missing_and_null() {
        let shape = solve(&[json!({"x": 1, "y": "a"}), json!({"x": 2, "y": null}), json!({"x": 3})]);
        let obj = shape.object.unwrap();
        assert_eq!(obj.seen, 3);
        let y = &obj.fields["y"];
        assert_eq!((y.present_in, y.non_null_in), (2, 1));
        assert!(y.is_optional(obj.seen));
        assert!(!obj.fields["x"].is_optional(obj.seen));
    }

    #[test]
    fn join_is_order_independent() {
        let a = json!({"id": 1, "tags": ["x"]});
        let b = json!({"id": "two", "extra": true});
        let c = json!([1, null]);
        let (sa, sb, sc) = (Shape::observe(&a), Shape::observe(&b), Shape::observe(&c));

        assert_eq!(Shape::join(&sa, &sa).kinds(), sa.kinds());
        assert_eq!(Shape::join(&sa, &sb).kinds(), Shape::join(&sb, &sa).kinds());
        let left = Shape::join(&Shape::join(&sa, &sb), &sc);
        let right = Shape::join(&sa, &Shape::join(&sb, &sc));
        assert_eq!(emit::emit_declarations(&left, "Root"), emit::emit_declarations(&right, "Root"));
    }

    #[test]
    fn tuples_need_heterogeneous_evidence() {
        let list = solve(&[json!([1, 2]), json!([3, 4])]);
        assert!(!list.array.unwrap().is_tuple());

        let tuple = solve(&[json!(["a", 1]), json!(["b", 2])]);
        assert!(tuple.array.unwrap().is_tuple());

        let padded = solve(&[json!([1, null, "x"]), json!([2, null])]);
        let arr = padded.array.unwrap();
        assert!(arr.is_tuple());
        assert_eq!(arr.required_prefix(), 2);
    }

    #[test]
    fn sample_order_only_moves_fields() {
        let a = json!({"x": 1, "tag": "on"});
        let b = json!({"y": "b", "tag": "off", "x": null});
        let ab = emit::emit_declarations(&solve(&[a.clone(), b.clone()]), "Root");
        let ba = emit::emit_declarations(&solve(&[b, a]), "Root");
        let mut ab_lines: Vec<&str> = ab.lines().collect();
        let mut ba_lines: Vec<&str> = ba.lines().collect();
        assert_ne!(ab_lines, ba_lines);
        ab_lines.sort_unstable();
        ba_lines.sort_unstable();
        assert_eq!(ab_lines, ba_lines);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(infer_declarations(std::iter::empty(), "Root").unwrap_err(), InferError::NoSamples);
    }

    #[test]
    fn ndjson_errors_name_the_line() {
        let err = parse_samples("in.ndjson", "{\"a\":1}\n\n{oops}\n", true).unwrap_err();
        let InferError::MalformedExampleData { input, .. } = err else { panic!() };
        assert_eq!(input, "in.ndjson:3");
        assert_eq!(parse_samples("x", "{\"a\":1}\n{\"a\":2}", true).unwrap().len(), 2);
        assert_eq!(parse_samples("x", "[1, 2]", false).unwrap(), vec![json!([1, 2])]);
    }
}
