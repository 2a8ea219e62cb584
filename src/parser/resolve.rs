//! Syntax tree -> schema declarations.
//!
//! Pass 1 collects every non-entity alias (and enum) body by name, so that
//! references resolve regardless of declaration order. Pass 2 converts each
//! declaration body with [`Resolver::resolve`]. Entity-shaped references are
//! never substituted: they stay `unknown` and are looked up at generation time.
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::syntax::{Decl, EnumMember, Member, TupleItem, TypeExpr};
use crate::schema::{Kind, Literal, Property, SchemaDeclaration, TupleElement, TypeNode, Utility};

enum AliasBody<'a> {
    Expr(&'a TypeExpr),
    Enum(Vec<(String, Literal)>),
}

pub struct Resolver<'a> {
    aliases: HashMap<&'a str, AliasBody<'a>>,
    /// Aliases currently being substituted; a repeat stays a reference.
    active: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn empty() -> Self {
        Self { aliases: HashMap::new(), active: Vec::new() }
    }

    /// Pass 1.
    pub fn collect(decls: &'a [Decl]) -> Self {
        let mut aliases = HashMap::new();
        for decl in decls {
            match decl {
                Decl::Alias { name, body, .. } if !is_entity_body(body) => {
                    aliases.insert(name.as_str(), AliasBody::Expr(body));
                }
                Decl::Enum { name, members, .. } => {
                    aliases.insert(name.as_str(), AliasBody::Enum(enum_values(members)));
                }
                _ => {}
            }
        }
        Self { aliases, active: Vec::new() }
    }

    /// Pass 2.
    pub fn declarations(&mut self, decls: &'a [Decl]) -> Vec<SchemaDeclaration> {
        let mut out: Vec<SchemaDeclaration> = Vec::new();
        let mut bases: HashMap<String, Vec<String>> = HashMap::new();

        for decl in decls {
            let declaration = match decl {
                Decl::Interface { name, extends, members, .. } => {
                    let parents = extends.iter().filter_map(reference_name).map(str::to_string);
                    bases.entry(name.clone()).or_default().extend(parents);
                    self.object_declaration(name, members)
                }
                Decl::Alias { name, body, .. } => match body {
                    TypeExpr::Object(members) if is_entity_body(body) => self.object_declaration(name, members),
                    _ => SchemaDeclaration::alias(name.clone(), self.resolve_alias_body(name, body)),
                },
                Decl::Enum { name, members, .. } => {
                    let values = enum_values(members).into_iter().map(|(_, v)| v).collect();
                    SchemaDeclaration::alias(name.clone(), TypeNode::new(name.clone(), Kind::Enum { values }))
                }
            };
            // interface declaration merging
            match out.iter_mut().find(|d| d.name == declaration.name && d.is_entity()) {
                Some(existing) if declaration.is_entity() => existing.properties.extend(declaration.properties),
                _ => out.push(declaration),
            }
        }

        apply_inheritance(&mut out, &bases);
        out
    }

    fn object_declaration(&mut self, name: &str, members: &[Member]) -> SchemaDeclaration {
        match self.resolve_object(members) {
            TypeNode { kind: Kind::Object { members }, .. } => SchemaDeclaration::entity(name, members),
            dictionary => SchemaDeclaration::alias(name, dictionary),
        }
    }

    pub fn resolve(&mut self, expr: &TypeExpr) -> TypeNode {
        match expr {
            TypeExpr::Paren(inner) => self.resolve(inner),
            TypeExpr::Array(element) => {
                TypeNode::new("array", Kind::Array { element: Box::new(self.resolve(element)) })
            }
            TypeExpr::Union(members) => {
                let members: Vec<TypeNode> = members.iter().map(|m| self.resolve(m)).collect();
                collapse_union(members)
            }
            TypeExpr::Intersection(members) => {
                let members = members.iter().map(|m| self.resolve(m)).collect();
                TypeNode::new("intersection", Kind::Intersection { members })
            }
            TypeExpr::Literal(value) => TypeNode::literal(value.clone()),
            TypeExpr::Null => TypeNode::literal(Literal::Null),
            TypeExpr::Template { raw, .. } => TypeNode::new("template", Kind::Template { pattern: raw.clone() }),
            TypeExpr::Tuple(items) => {
                let elements = items.iter().map(|item| self.tuple_element(item)).collect();
                TypeNode::new("tuple", Kind::Tuple { elements })
            }
            TypeExpr::Object(members) => self.resolve_object(members),
            TypeExpr::Keyword(word) => TypeNode::primitive(word).unwrap_or_else(|| TypeNode::unknown(word.clone())),
            TypeExpr::Opaque(text) => TypeNode::unknown(text.clone()),
            TypeExpr::Reference { name, args, .. } => self.resolve_reference(name, args),
        }
    }

    fn tuple_element(&mut self, item: &TupleItem) -> TupleElement {
        TupleElement { ty: self.resolve(&item.ty), name: item.name.clone(), optional: item.optional, rest: item.rest }
    }

    /// Arguments of built-in generics and utilities keep bare references as
    /// `unknown`, so their names still reach the generator.
    fn resolve_arg(&mut self, expr: &TypeExpr) -> TypeNode {
        match expr {
            TypeExpr::Reference { name, args, .. } if args.is_empty() && name != "Date" => {
                self.enum_member(name).unwrap_or_else(|| TypeNode::unknown(name.clone()))
            }
            TypeExpr::Paren(inner) => self.resolve_arg(inner),
            other => self.resolve(other),
        }
    }

    fn resolve_reference(&mut self, name: &str, args: &[TypeExpr]) -> TypeNode {
        match (name, args) {
            ("Date", _) => return TypeNode::new("Date", Kind::Date),
            ("Array" | "ReadonlyArray", [element]) => {
                let element = Box::new(self.resolve_arg(element));
                return TypeNode::new("array", Kind::Array { element });
            }
            ("Map" | "ReadonlyMap" | "WeakMap", [key, value]) => {
                let key = Box::new(self.resolve_arg(key));
                let value = Box::new(self.resolve_arg(value));
                return TypeNode::new("map", Kind::Map { key, value });
            }
            ("Set" | "ReadonlySet" | "WeakSet", [element]) => {
                let element = Box::new(self.resolve_arg(element));
                return TypeNode::new("set", Kind::Set { element });
            }
            _ => {}
        }
        if let Some(tag) = Utility::from_name(name).filter(|_| !args.is_empty()) {
            let args = args.iter().map(|a| self.resolve_arg(a)).collect();
            return TypeNode::new(name, Kind::Utility { tag, args });
        }
        if let Some(member) = self.enum_member(name) {
            return member;
        }
        if self.active.iter().any(|n| n == name) {
            return TypeNode::unknown(name);
        }
        let body = match self.aliases.get(name) {
            Some(AliasBody::Expr(body)) => *body,
            Some(AliasBody::Enum(values)) => {
                let values = values.iter().map(|(_, v)| v.clone()).collect();
                return TypeNode::new(name, Kind::Enum { values }).with_type_hint(name);
            }
            None => return TypeNode::unknown(name),
        };
        let node = self.resolve_alias_body(name, body);
        node.with_type_hint(name)
    }

    fn resolve_alias_body(&mut self, name: &str, body: &TypeExpr) -> TypeNode {
        self.active.push(name.to_string());
        let node = self.resolve(body);
        self.active.pop();
        node
    }

    /// `Color.Red` -> the member's literal.
    fn enum_member(&self, path: &str) -> Option<TypeNode> {
        let (head, member) = path.split_once('.')?;
        match self.aliases.get(head)? {
            AliasBody::Enum(values) => values
                .iter()
                .find(|(n, _)| n == member)
                .map(|(_, v)| TypeNode::literal(v.clone())),
            AliasBody::Expr(_) => None,
        }
    }

    fn resolve_object(&mut self, members: &[Member]) -> TypeNode {
        let mut props = IndexMap::new();
        let mut index = None;
        for member in members {
            match member {
                Member::Property { name, optional, ty, .. } => {
                    let mut node = self.resolve(ty);
                    if let Some(reference) = direct_reference(ty) {
                        node.type_hint = Some(reference.to_string());
                    }
                    props.insert(name.clone(), Property { ty: node, optional: *optional });
                }
                Member::Index { key_name, key, value, .. } => {
                    if index.is_none() {
                        index = Some((key_name, key, value));
                    }
                }
                Member::Method { .. } => {}
            }
        }
        match index {
            Some((key_name, key, value)) if props.is_empty() => {
                let args = vec![self.resolve_arg(key), self.resolve_arg(value)];
                let mut node = TypeNode::new("Record", Kind::Utility { tag: Utility::Record, args });
                node.key_hint = Some(key_name.clone());
                node
            }
            _ => TypeNode::new("object", Kind::Object { members: props }),
        }
    }
}

/// Union of literals (or of already-collapsed enums) becomes an enum.
fn collapse_union(members: Vec<TypeNode>) -> TypeNode {
    let all_literal = members
        .iter()
        .all(|m| matches!(m.kind, Kind::Literal { .. } | Kind::Enum { .. }));
    if !all_literal {
        return TypeNode::new("union", Kind::Union { members });
    }
    let mut values = Vec::new();
    for member in members {
        match member.kind {
            Kind::Literal { value } => values.push(value),
            Kind::Enum { values: inner } => values.extend(inner),
            _ => {}
        }
    }
    TypeNode::new("enum", Kind::Enum { values })
}

/// An object literal with at least one named property.
fn is_entity_body(body: &TypeExpr) -> bool {
    match body {
        TypeExpr::Object(members) => members.iter().any(|m| matches!(m, Member::Property { .. })),
        _ => false,
    }
}

fn reference_name(expr: &TypeExpr) -> Option<&str> {
    match expr {
        TypeExpr::Reference { name, .. } => Some(name),
        _ => None,
    }
}

/// A property typed as a plain named reference (not a generic or utility form).
fn direct_reference(expr: &TypeExpr) -> Option<&str> {
    match expr {
        TypeExpr::Reference { name, args, .. } if args.is_empty() && name != "Date" => Some(name),
        _ => None,
    }
}

fn enum_values(members: &[EnumMember]) -> Vec<(String, Literal)> {
    let mut next = 0.0;
    members
        .iter()
        .map(|member| {
            let value = match &member.value {
                Some(Literal::Num(n)) => {
                    next = n + 1.0;
                    Literal::Num(*n)
                }
                Some(other) => other.clone(),
                None => {
                    let value = Literal::Num(next);
                    next += 1.0;
                    value
                }
            };
            (member.name.clone(), value)
        })
        .collect()
}

/// Parents' properties first, own properties override.
fn apply_inheritance(decls: &mut [SchemaDeclaration], bases: &HashMap<String, Vec<String>>) {
    fn inherited(
        name: &str,
        decls: &[SchemaDeclaration],
        bases: &HashMap<String, Vec<String>>,
        seen: &mut HashSet<String>,
    ) -> IndexMap<String, Property> {
        let mut props = IndexMap::new();
        if !seen.insert(name.to_string()) {
            return props;
        }
        for parent in bases.get(name).into_iter().flatten() {
            props.extend(inherited(parent, decls, bases, seen));
            if let Some(decl) = decls.iter().find(|d| &d.name == parent && d.is_entity()) {
                props.extend(decl.properties.clone());
            }
        }
        props
    }

    let merged: Vec<(usize, IndexMap<String, Property>)> = decls
        .iter()
        .enumerate()
        .filter(|(_, d)| bases.get(&d.name).is_some_and(|b| !b.is_empty()))
        .map(|(i, d)| {
            let mut props = inherited(&d.name, decls, bases, &mut HashSet::new());
            props.extend(d.properties.clone());
            (i, props)
        })
        .collect();
    for (i, props) in merged {
        decls[i].properties = props;
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_declarations;
    use crate::schema::{Kind, Literal, SchemaDeclaration, Utility};

    fn decl<'a>(decls: &'a [SchemaDeclaration], name: &str) -> &'a SchemaDeclaration {
        decls.iter().find(|d| d.name == name).unwrap()
    }

    #[test]
    fn literal_union_collapses_to_enum_in_source_order() {
        let decls = parse_declarations("interface U { role: 'admin' | 'user' | 'admin' }").unwrap();
        let role = &decl(&decls, "U").properties["role"].ty;
        assert_eq!(
            role.kind,
            Kind::Enum {
                values: vec![
                    Literal::Str("admin".into()),
                    Literal::Str("user".into()),
                    Literal::Str("admin".into())
                ]
            }
        );
    }

    #[test]
    fn forward_alias_is_substituted_with_hint() {
        let decls = parse_declarations("interface U { contact: Email }\ntype Email = string;").unwrap();
        let contact = &decl(&decls, "U").properties["contact"].ty;
        assert_eq!(contact.kind, Kind::String);
        assert_eq!(contact.type_hint.as_deref(), Some("Email"));
        assert!(!decl(&decls, "Email").is_entity());
    }

    #[test]
    fn entity_references_stay_unknown() {
        let decls = parse_declarations("interface A { b: B; list: B[] }\ninterface B { a?: A }").unwrap();
        let a = decl(&decls, "A");
        assert!(a.properties["b"].ty.is_unknown());
        assert_eq!(a.properties["b"].ty.name, "B");
        let Kind::Array { element } = &a.properties["list"].ty.kind else { panic!() };
        assert!(element.is_unknown());
        assert!(decl(&decls, "B").properties["a"].optional);
    }

    #[test]
    fn generic_arguments_are_not_substituted() {
        let decls = parse_declarations("type Email = string;\ninterface U { mails: Array<Email>; tags: Set<string> }").unwrap();
        let u = decl(&decls, "U");
        let Kind::Array { element } = &u.properties["mails"].ty.kind else { panic!() };
        assert!(element.is_unknown());
        assert_eq!(element.name, "Email");
        assert!(matches!(u.properties["tags"].ty.kind, Kind::Set { .. }));
    }

    #[test]
    fn utility_keeps_tag_and_arguments() {
        let decls = parse_declarations("interface E { x: string }\ntype P = Pick<E, 'x'>;").unwrap();
        let p = decl(&decls, "P").alias_target().unwrap();
        let Kind::Utility { tag, args } = &p.kind else { panic!() };
        assert_eq!(*tag, Utility::Pick);
        assert!(args[0].is_unknown());
        assert!(matches!(args[1].kind, Kind::Literal { .. }));
    }

    #[test]
    fn index_signature_becomes_record_with_key_hint() {
        let decls = parse_declarations("type Scores = { [playerName: string]: number }").unwrap();
        let scores = decl(&decls, "Scores").alias_target().unwrap();
        assert!(matches!(scores.kind, Kind::Utility { tag: Utility::Record, .. }));
        assert_eq!(scores.key_hint.as_deref(), Some("playerName"));
    }

    #[test]
    fn self_referential_alias_does_not_loop() {
        let decls = parse_declarations("type Json = string | number | Json[];").unwrap();
        let json = decl(&decls, "Json").alias_target().unwrap();
        let Kind::Union { members } = &json.kind else { panic!() };
        let Kind::Array { element } = &members[2].kind else { panic!() };
        assert!(element.is_unknown());
        assert_eq!(element.name, "Json");
    }

    #[test]
    fn interfaces_inherit_and_merge() {
        let decls = parse_declarations(
            "interface Base { id: string; kind: string }\ninterface User extends Base { kind: 'user'; name: string }\ninterface User { email: string }",
        )
        .unwrap();
        let user = decl(&decls, "User");
        let keys: Vec<&str> = user.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "kind", "name", "email"]);
        assert!(matches!(user.properties["kind"].ty.kind, Kind::Literal { .. }));
    }

    #[test]
    fn enums_and_member_references() {
        let decls = parse_declarations("enum Level { Low, High = 10, Top }\ninterface T { l: Level; top: Level.Top }").unwrap();
        let t = decl(&decls, "T");
        assert_eq!(
            t.properties["l"].ty.kind,
            Kind::Enum { values: vec![Literal::Num(0.0), Literal::Num(10.0), Literal::Num(11.0)] }
        );
        assert_eq!(t.properties["top"].ty.kind, Kind::Literal { value: Literal::Num(11.0) });
    }
}
