//! Utility-type generation: `Partial<T>`, `Pick<T, K>`, `Record<K, V>` and
//! the rest of the recognized set.
use indexmap::{IndexMap, IndexSet};
use rand::Rng;
use serde_json::Value;
use tracing::debug;

use super::{Generator, MAX_REPEAT, semantics};
use crate::schema::{Kind, Literal, Property, TypeNode, Utility};

/// Alias-to-alias hops followed before giving up on a shape or key set.
const MAX_HOPS: usize = 8;

/// Property set rebuilt from an entity (or inline object) for a transform.
struct Shape<'a> {
    origin: Option<&'a str>,
    properties: IndexMap<String, Property>,
}

impl<'a> Generator<'a> {
    pub(super) fn utility(&mut self, hint: &str, tag: Utility, args: &[TypeNode], node: &TypeNode) -> Value {
        let Some(base) = args.first() else {
            return Value::Null;
        };
        match tag {
            Utility::Readonly | Utility::Promise | Utility::Awaited => self.generate_value(hint, base),
            Utility::Lowercase | Utility::Uppercase | Utility::Capitalize | Utility::Uncapitalize => {
                match self.generate_value(hint, base) {
                    Value::String(s) => Value::String(change_case(tag, &s)),
                    other => other,
                }
            }
            Utility::Partial | Utility::Required | Utility::Pick | Utility::Omit => match self.shape(node, 0) {
                Some(shape) => self.transient(shape),
                None => {
                    debug!(utility = ?tag, base = %base.name, "no property set for utility, generating the base");
                    self.generate_value(hint, base)
                }
            },
            Utility::Record => match args.get(1) {
                Some(value) => self.record(hint, base, value, node.key_hint.as_deref()),
                None => self.generate_value(hint, base),
            },
            Utility::NonNullable | Utility::Exclude | Utility::Extract => {
                let mut members = self.alternatives(base, 0);
                match tag {
                    Utility::NonNullable => members.retain(|m| !is_nullish(m)),
                    _ => {
                        let keys = args.get(1).map(|k| self.key_set(k)).unwrap_or_default();
                        let keep = tag == Utility::Extract;
                        members.retain(|m| keys.contains(&member_key(m)) == keep);
                    }
                }
                if members.is_empty() {
                    return Value::Null;
                }
                let pick = self.rng.gen_range(0..members.len());
                self.generate_value(hint, &members[pick])
            }
        }
    }

    fn transient(&mut self, shape: Shape<'a>) -> Value {
        let Some(name) = shape.origin else {
            return self.object(&shape.properties);
        };
        if self.path.iter().filter(|n| **n == name).count() >= MAX_REPEAT {
            return Value::Null;
        }
        self.path.push(name);
        let value = self.object(&shape.properties);
        self.path.pop();
        value
    }

    /// Properties a node denotes, following entity lookups, alias
    /// references and nested optionality/selection transforms.
    fn shape(&self, node: &TypeNode, hops: usize) -> Option<Shape<'a>> {
        if hops > MAX_HOPS {
            return None;
        }
        match &node.kind {
            Kind::Object { members } => Some(Shape { origin: None, properties: members.clone() }),
            Kind::Unknown => {
                let decl = self.table.get(&node.name)?;
                match decl.alias_target() {
                    Some(target) => self.shape(target, hops + 1),
                    None => Some(Shape { origin: Some(decl.name.as_str()), properties: decl.properties.clone() }),
                }
            }
            Kind::Utility { tag, args } => {
                let mut shape = self.shape(args.first()?, hops + 1)?;
                match tag {
                    Utility::Partial => shape.properties.values_mut().for_each(|p| p.optional = true),
                    Utility::Required => shape.properties.values_mut().for_each(|p| p.optional = false),
                    Utility::Pick | Utility::Omit => {
                        let keys = args.get(1).map(|k| self.key_set(k)).unwrap_or_default();
                        let keep = *tag == Utility::Pick;
                        shape.properties.retain(|name, _| keys.contains(name) == keep);
                    }
                    Utility::Readonly => {}
                    _ => return None,
                }
                Some(shape)
            }
            _ => None,
        }
    }

    /// Flattens a literal, enum, union, or alias of these into property names.
    fn key_set(&self, node: &TypeNode) -> IndexSet<String> {
        let mut keys = IndexSet::new();
        self.collect_keys(node, &mut keys, 0);
        keys
    }

    /// Declaration-ordered keys when the node denotes only literals.
    pub(super) fn finite_keys(&self, node: &TypeNode) -> Option<IndexSet<String>> {
        let mut keys = IndexSet::new();
        let closed = self.collect_keys(node, &mut keys, 0);
        (closed && !keys.is_empty()).then_some(keys)
    }

    /// `false` once anything other than a literal was met.
    fn collect_keys(&self, node: &TypeNode, out: &mut IndexSet<String>, hops: usize) -> bool {
        if hops > MAX_HOPS {
            return false;
        }
        match &node.kind {
            Kind::Literal { value } => {
                out.insert(value.as_key());
                true
            }
            Kind::Enum { values } => {
                out.extend(values.iter().map(Literal::as_key));
                true
            }
            Kind::Union { members } => {
                members.iter().fold(true, |closed, m| self.collect_keys(m, out, hops + 1) && closed)
            }
            Kind::Unknown => match self.table.get(&node.name).and_then(|d| d.alias_target()) {
                Some(target) => self.collect_keys(target, out, hops + 1),
                None => false,
            },
            _ => false,
        }
    }

    /// Member alternatives of a union-like node, for narrowing utilities.
    fn alternatives(&self, node: &TypeNode, hops: usize) -> Vec<TypeNode> {
        match &node.kind {
            Kind::Enum { values } => values.iter().cloned().map(TypeNode::literal).collect(),
            Kind::Union { members } => members.clone(),
            Kind::Unknown if hops <= MAX_HOPS => match self.table.get(&node.name).and_then(|d| d.alias_target()) {
                Some(target) => self.alternatives(target, hops + 1),
                None => vec![node.clone()],
            },
            _ => vec![node.clone()],
        }
    }
}

fn change_case(tag: Utility, text: &str) -> String {
    match tag {
        Utility::Lowercase => text.to_lowercase(),
        Utility::Uppercase => text.to_uppercase(),
        Utility::Capitalize => semantics::capitalize(text),
        Utility::Uncapitalize => semantics::uncapitalize(text),
        _ => text.to_string(),
    }
}

fn is_nullish(node: &TypeNode) -> bool {
    matches!(node.kind, Kind::Literal { value: Literal::Null })
}

fn member_key(node: &TypeNode) -> String {
    match &node.kind {
        Kind::Literal { value } => value.as_key(),
        _ => node.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::generate::{GenerateConfig, generate};
    use crate::parser::parse_declarations;

    fn values(src: &str, root: &str, n: usize) -> Vec<Value> {
        let decls = parse_declarations(src).unwrap();
        let config = GenerateConfig { quantity: n, seed: Some(21), root: Some(root.into()) };
        generate(&decls, &config).unwrap().values
    }

    const USER: &str = "interface User { id: string; name: string; email?: string; age: number }\n";

    #[test]
    fn pick_and_omit_partition_properties() {
        let src = format!("{USER}type Keys = 'id' | 'email';\ninterface Root {{ p: Pick<User, Keys>; o: Omit<User, Keys> }}");
        for v in values(&src, "Root", 50) {
            let picked = v["p"].as_object().unwrap();
            let omitted = v["o"].as_object().unwrap();
            assert!(picked.keys().all(|k| k == "id" || k == "email"));
            assert!(picked.contains_key("id"));
            assert_eq!(omitted.keys().collect::<Vec<_>>(), vec!["name", "age"]);
        }
    }

    #[test]
    fn required_includes_every_property() {
        let src = format!("{USER}interface Root {{ r: Required<User> }}");
        for v in values(&src, "Root", 100) {
            assert_eq!(v["r"].as_object().unwrap().len(), 4);
        }
    }

    #[test]
    fn partial_sometimes_drops_properties() {
        let src = format!("{USER}interface Root {{ p: Partial<User> }}");
        let sizes: Vec<usize> = values(&src, "Root", 200).iter().map(|v| v["p"].as_object().unwrap().len()).collect();
        assert!(sizes.iter().any(|n| *n < 4));
        assert!(sizes.iter().all(|n| *n <= 4));
    }

    #[test]
    fn record_bounds_and_case_transforms() {
        let src = "interface Root { scores: Record<string, number>; shout: Uppercase<'abc'>; cap: Capitalize<'hello'> }";
        for v in values(src, "Root", 50) {
            let scores = v["scores"].as_object().unwrap();
            assert!((2..=5).contains(&scores.len()));
            assert!(scores.values().all(Value::is_number));
            assert_eq!(v["shout"], "ABC");
            assert_eq!(v["cap"], "Hello");
        }
    }

    #[test]
    fn narrowing_utilities_filter_members() {
        let src = "type Status = 'on' | 'off' | 'broken';\ninterface Root { ok: Exclude<Status, 'broken'>; bad: Extract<Status, 'broken'>; some: NonNullable<string | null> }";
        for v in values(src, "Root", 50) {
            assert!(["on", "off"].contains(&v["ok"].as_str().unwrap()));
            assert_eq!(v["bad"], "broken");
            assert!(v["some"].is_string());
        }
    }

    #[test]
    fn passthrough_wrappers_generate_the_base() {
        let src = format!("{USER}interface Root {{ later: Promise<User>; frozen: Readonly<number> }}");
        let v = values(&src, "Root", 1).remove(0);
        assert!(v["later"]["id"].is_string());
        assert!(v["frozen"].is_number());
    }
}
