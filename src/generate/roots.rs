//! Picks the top-level declaration to instantiate.
use std::collections::HashSet;

use crate::schema::{Kind, SchemaDeclaration, TypeNode};

/// First entity never referenced by another declaration. Falls back to the
/// first entity when every one is referenced, then to the first declaration
/// of any kind when there are no entities at all.
pub fn select_root(declarations: &[SchemaDeclaration]) -> Option<&SchemaDeclaration> {
    let mut referenced = HashSet::new();
    for decl in declarations {
        let mut names = HashSet::new();
        for prop in decl.properties.values() {
            collect_references(&prop.ty, &mut names);
        }
        names.remove(decl.name.as_str());
        referenced.extend(names);
    }
    let mut entities = declarations.iter().filter(|d| d.is_entity());
    entities
        .clone()
        .find(|d| !referenced.contains(d.name.as_str()))
        .or_else(|| entities.next())
        .or_else(|| declarations.first())
}

fn collect_references<'n>(node: &'n TypeNode, out: &mut HashSet<&'n str>) {
    match &node.kind {
        Kind::Unknown => {
            out.insert(node.name.as_str());
        }
        Kind::Array { element } | Kind::Set { element } => collect_references(element, out),
        Kind::Map { key, value } => {
            collect_references(key, out);
            collect_references(value, out);
        }
        Kind::Object { members } => members.values().for_each(|p| collect_references(&p.ty, out)),
        Kind::Union { members } | Kind::Intersection { members } => {
            members.iter().for_each(|m| collect_references(m, out))
        }
        Kind::Tuple { elements } => elements.iter().for_each(|e| collect_references(&e.ty, out)),
        Kind::Utility { args, .. } => args.iter().for_each(|a| collect_references(a, out)),
        Kind::String
        | Kind::Number
        | Kind::Boolean
        | Kind::Date
        | Kind::Enum { .. }
        | Kind::Literal { .. }
        | Kind::Template { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declarations;

    fn root_of(src: &str) -> Option<String> {
        let decls = parse_declarations(src).unwrap();
        select_root(&decls).map(|d| d.name.clone())
    }

    #[test]
    fn unreferenced_entity_wins_regardless_of_order() {
        let src = "interface Address { city: string }\ninterface User { home: Address; tags: Tag[] }\ninterface Tag { label: string }";
        assert_eq!(root_of(src).as_deref(), Some("User"));
    }

    #[test]
    fn aliases_are_not_candidates() {
        let src = "type Id = string;\ninterface Item { id: Id }";
        assert_eq!(root_of(src).as_deref(), Some("Item"));
    }

    #[test]
    fn cycles_fall_back_to_first_entity() {
        let src = "interface A { b: B }\ninterface B { a: A }";
        assert_eq!(root_of(src).as_deref(), Some("A"));
    }

    #[test]
    fn self_reference_does_not_disqualify() {
        let src = "interface Leaf { x: 1 }\ninterface Tree { kids: Tree[]; leaf: Leaf }";
        assert_eq!(root_of(src).as_deref(), Some("Tree"));
    }

    #[test]
    fn alias_only_input_uses_first_declaration() {
        assert_eq!(root_of("type A = string;\ntype B = number;").as_deref(), Some("A"));
        assert_eq!(root_of(""), None);
    }
}
