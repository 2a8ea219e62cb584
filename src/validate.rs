//! Advisory diagnostics over declaration source.
//!
//! Nothing here gates generation. Some diagnostics describe grammar the
//! parser deliberately tolerates; those are dropped by message pattern
//! before the report is built.
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parser::parse_syntax;
use crate::parser::syntax::{Decl, Member, Pos, TypeExpr};

/// Placeholders past this count make a template "too complex".
const TEMPLATE_PLACEHOLDER_LIMIT: usize = 4;

static SUPPRESSED: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^An index signature parameter type must be",
        r"too complex to represent",
        r"^Cannot find name '(Array|ReadonlyArray|Map|ReadonlyMap|WeakMap|Set|ReadonlySet|WeakSet|Record|Partial|Required|Readonly|Pick|Omit|Date|Promise|Awaited|NonNullable|Exclude|Extract|Uppercase|Lowercase|Capitalize|Uncapitalize)'\.$",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("static regex"))
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn is_suppressed(message: &str) -> bool {
    SUPPRESSED.iter().any(|re| re.is_match(message))
}

pub fn validate(source: &str) -> ValidationReport {
    let raw = match parse_syntax(source) {
        Ok(decls) => Checker::new(&decls).run(&decls),
        Err(error) => vec![Diagnostic { line: error.line, column: error.column, message: error.message }],
    };
    let diagnostics: Vec<Diagnostic> = raw.into_iter().filter(|d| !is_suppressed(&d.message)).collect();
    ValidationReport { valid: diagnostics.is_empty(), diagnostics }
}

struct Checker<'a> {
    declared: HashSet<&'a str>,
    /// Enum name -> member names, for `Enum.Member` references.
    enums: HashMap<&'a str, Vec<&'a str>>,
    params: Vec<&'a str>,
    out: Vec<Diagnostic>,
}

impl<'a> Checker<'a> {
    fn new(decls: &'a [Decl]) -> Self {
        let mut enums = HashMap::new();
        for decl in decls {
            if let Decl::Enum { name, members, .. } = decl {
                enums.insert(name.as_str(), members.iter().map(|m| m.name.as_str()).collect());
            }
        }
        Self { declared: decls.iter().map(Decl::name).collect(), enums, params: Vec::new(), out: Vec::new() }
    }

    fn run(mut self, decls: &'a [Decl]) -> Vec<Diagnostic> {
        self.duplicates(decls);
        for decl in decls {
            match decl {
                Decl::Interface { params, extends, members, .. } => {
                    self.params = params.iter().map(String::as_str).collect();
                    extends.iter().for_each(|e| self.expr(e));
                    self.members(members);
                }
                Decl::Alias { params, body, .. } => {
                    self.params = params.iter().map(String::as_str).collect();
                    self.expr(body);
                }
                Decl::Enum { .. } => {}
            }
            self.params.clear();
        }
        self.out
    }

    /// Interfaces merge with each other; any other repeat is a clash.
    fn duplicates(&mut self, decls: &[Decl]) {
        let mut seen: HashMap<&str, bool> = HashMap::new();
        for decl in decls {
            let interface = matches!(decl, Decl::Interface { .. });
            match seen.get(decl.name()).copied() {
                Some(prev_interface) if prev_interface && interface => {}
                Some(_) => self.report(decl.pos(), format!("Duplicate identifier '{}'.", decl.name())),
                None => {
                    seen.insert(decl.name(), interface);
                }
            }
        }
    }

    fn members(&mut self, members: &'a [Member]) {
        for member in members {
            match member {
                Member::Property { ty, .. } => self.expr(ty),
                Member::Index { key_name, key, value, pos } => {
                    if !is_index_key(key) {
                        self.report(
                            *pos,
                            "An index signature parameter type must be 'string', 'number', 'symbol', or a template literal type."
                                .to_string(),
                        );
                    }
                    self.expr(key);
                    // `[K in Keys]: V` binds K inside V
                    self.params.push(key_name.as_str());
                    self.expr(value);
                    self.params.pop();
                }
                Member::Method { .. } => {}
            }
        }
    }

    fn expr(&mut self, expr: &'a TypeExpr) {
        match expr {
            TypeExpr::Reference { name, args, pos } => {
                self.reference(name, *pos);
                args.iter().for_each(|a| self.expr(a));
            }
            TypeExpr::Template { raw, pos } => {
                if raw.matches("${").count() > TEMPLATE_PLACEHOLDER_LIMIT {
                    self.report(*pos, "Expression produces a union type that is too complex to represent.".to_string());
                }
            }
            TypeExpr::Array(inner) | TypeExpr::Paren(inner) => self.expr(inner),
            TypeExpr::Tuple(items) => items.iter().for_each(|i| self.expr(&i.ty)),
            TypeExpr::Object(members) => self.members(members),
            TypeExpr::Union(members) | TypeExpr::Intersection(members) => members.iter().for_each(|m| self.expr(m)),
            TypeExpr::Keyword(_) | TypeExpr::Null | TypeExpr::Literal(_) | TypeExpr::Opaque(_) => {}
        }
    }

    fn reference(&mut self, name: &str, pos: Pos) {
        if let Some((head, member)) = name.split_once('.') {
            let known = self.enums.get(head).map(|members| members.iter().any(|m| *m == member));
            match known {
                Some(false) => {
                    self.report(pos, format!("Property '{member}' does not exist on type 'typeof {head}'."));
                }
                Some(true) => {}
                None if self.declared.contains(head) => {}
                None => self.report(pos, format!("Cannot find namespace '{head}'.")),
            }
            return;
        }
        if self.declared.contains(name) || self.params.iter().any(|p| *p == name) {
            return;
        }
        self.report(pos, format!("Cannot find name '{name}'."));
    }

    fn report(&mut self, pos: Pos, message: String) {
        self.out.push(Diagnostic { line: pos.line, column: pos.column, message });
    }
}

fn is_index_key(key: &TypeExpr) -> bool {
    match key {
        TypeExpr::Keyword(word) => matches!(word.as_str(), "string" | "number" | "symbol"),
        TypeExpr::Template { .. } => true,
        TypeExpr::Paren(inner) => is_index_key(inner),
        TypeExpr::Union(members) => members.iter().all(is_index_key),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(source: &str) -> Vec<String> {
        validate(source).diagnostics.into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn clean_source_is_valid() {
        let src = "type Id = string;\ninterface User { id: Id; tags: Array<string>; meta: Record<string, number>; at: Date }";
        let report = validate(src);
        assert!(report.valid, "{:?}", report.diagnostics);
    }

    #[test]
    fn syntax_error_is_reported_with_position() {
        let report = validate("interface A { x: }");
        assert!(!report.valid);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].line, 1);
    }

    #[test]
    fn unknown_names_are_reported() {
        assert_eq!(messages("interface A { b: Missing }"), vec!["Cannot find name 'Missing'."]);
    }

    #[test]
    fn generic_params_are_in_scope() {
        assert!(validate("interface Box<T> { value: T }\ntype Pair<K, V> = [K, V];").valid);
    }

    #[test]
    fn interfaces_merge_but_aliases_clash() {
        assert!(validate("interface A { x: 1 }\ninterface A { y: 2 }").valid);
        assert_eq!(messages("type A = string;\ninterface A { y: 2 }"), vec!["Duplicate identifier 'A'."]);
    }

    #[test]
    fn tolerated_extensions_are_suppressed() {
        let src = "type Key = string;\ninterface M { [k: Key]: number; code: `${string}-${string}-${string}-${string}-${string}` }";
        assert!(validate(src).valid);
    }

    #[test]
    fn enum_member_references_are_checked() {
        let src = "enum Color { Red, Green }\ninterface P { a: Color.Red; b: Color.Blue }";
        assert_eq!(messages(src), vec!["Property 'Blue' does not exist on type 'typeof Color'."]);
    }

    #[test]
    fn mapped_key_variable_is_in_scope_for_the_value() {
        let src = "type Keys = 'a' | 'b';\ninterface Wrap<T> { v: T }\ntype M = { [K in Keys]: Wrap<K> };";
        assert!(validate(src).valid, "{:?}", validate(src).diagnostics);
        assert_eq!(messages("type M = { [K in string]: J };"), vec!["Cannot find name 'J'."]);
    }

    #[test]
    fn builtin_generic_names_are_suppressed() {
        assert!(is_suppressed("Cannot find name 'Record'."));
        assert!(!is_suppressed("Cannot find name 'Recordz'."));
    }
}
