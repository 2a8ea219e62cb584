//! Solved [`Shape`] -> declaration source text.
//!
//! Object shapes become interfaces, discovered breadth first so the root
//! leads the output and stays the unreferenced entity.
use std::collections::{HashSet, VecDeque};
use std::fmt::Write;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ObjC, Shape};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static regex"));

/// Interface names that would shadow built-in generics or keywords.
const RESERVED: &[&str] = &[
    "Array", "Date", "Map", "Set", "Record", "Partial", "Required", "Readonly", "Pick", "Omit", "Promise",
    "Awaited", "Uppercase", "Lowercase", "Capitalize", "Uncapitalize", "NonNullable", "Exclude", "Extract",
    "Object", "String", "Number", "Boolean", "Function", "Symbol",
];

pub fn emit_declarations(shape: &Shape, root_name: &str) -> String {
    Emitter::default().run(shape, root_name)
}

#[derive(Default)]
struct Emitter<'s> {
    taken: HashSet<String>,
    pending: VecDeque<(String, &'s ObjC)>,
}

impl<'s> Emitter<'s> {
    fn run(mut self, shape: &'s Shape, root_name: &str) -> String {
        let root = sanitize(root_name).unwrap_or_else(|| "Root".to_string());
        self.taken.insert(root.clone());
        let mut out = String::new();
        match &shape.object {
            Some(obj) if shape.kinds() == 1 << 4 && !shape.null => self.pending.push_back((root, obj)),
            _ => {
                let body = self.type_expr(shape, "", &root);
                let _ = writeln!(out, "type {root} = {body};");
            }
        }
        while let Some((name, obj)) = self.pending.pop_front() {
            if !out.is_empty() {
                out.push('\n');
            }
            self.interface(&mut out, &name, obj);
        }
        out
    }

    fn interface(&mut self, out: &mut String, name: &str, obj: &'s ObjC) {
        let _ = writeln!(out, "interface {name} {{");
        for (field, info) in &obj.fields {
            let optional = info.is_optional(obj.seen);
            let mut ty = self.type_expr(&info.shape, name, field);
            // optionality already covers null
            if let Some(stripped) = ty.strip_suffix(" | null").filter(|_| optional) {
                ty = stripped.to_string();
            }
            let marker = if optional { "?" } else { "" };
            let _ = write!(out, "  {}{marker}: {ty};", property_name(field));
            if let Some(num) = info.shape.number.as_ref().filter(|_| ty == "number") {
                let _ = write!(out, " // {}", num.describe());
            }
            out.push('\n');
        }
        out.push_str("}\n");
    }

    fn type_expr(&mut self, shape: &'s Shape, parent: &str, hint: &str) -> String {
        let mut arms: Vec<String> = Vec::new();
        if let Some(obj) = &shape.object {
            let name = self.allocate(parent, hint);
            self.pending.push_back((name.clone(), obj));
            arms.push(name);
        }
        if let Some(arr) = &shape.array {
            let singular = format!("{hint}Item");
            if arr.is_tuple() {
                let required = arr.required_prefix();
                let elements: Vec<String> = arr
                    .cols
                    .iter()
                    .enumerate()
                    .map(|(i, col)| {
                        let ty = self.type_expr(col, parent, &format!("{hint}{i}"));
                        if i < required { ty } else { format!("{}?", parenthesize(ty)) }
                    })
                    .collect();
                arms.push(format!("[{}]", elements.join(", ")));
            } else if arr.item.is_bottom() {
                arms.push("unknown[]".to_string());
            } else {
                let item = self.type_expr(&arr.item, parent, &singular);
                arms.push(format!("{}[]", parenthesize(item)));
            }
        }
        if let Some(string) = &shape.string {
            match string.literal_union() {
                _ if string.all_dates => arms.push("Date".to_string()),
                Some(literals) => arms.extend(literals.into_iter().map(quote)),
                None => arms.push("string".to_string()),
            }
        }
        if shape.number.is_some() {
            arms.push("number".to_string());
        }
        if shape.boolean {
            arms.push("boolean".to_string());
        }
        if shape.null {
            arms.push("null".to_string());
        }
        if arms.is_empty() {
            return "unknown".to_string();
        }
        arms.join(" | ")
    }

    /// PascalCase of the field; on collision the parent name is prefixed,
    /// then a counter appended.
    fn allocate(&mut self, parent: &str, hint: &str) -> String {
        let base = sanitize(hint).unwrap_or_else(|| "Item".to_string());
        let mut candidate = base.clone();
        if self.taken.contains(&candidate) || RESERVED.contains(&candidate.as_str()) {
            candidate = format!("{parent}{base}");
        }
        let stem = candidate.clone();
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{stem}{n}");
            n += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

/// PascalCase identifier from arbitrary text, `None` when nothing usable is left.
fn sanitize(text: &str) -> Option<String> {
    let mut out = String::new();
    for word in text.split(|c: char| !c.is_ascii_alphanumeric()).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    match out.chars().next() {
        None => None,
        Some(c) if c.is_ascii_digit() => Some(format!("T{out}")),
        Some(_) => Some(out),
    }
}

fn property_name(name: &str) -> String {
    if IDENTIFIER.is_match(name) { name.to_string() } else { quote(name) }
}

fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

fn parenthesize(ty: String) -> String {
    if ty.contains(" | ") { format!("({ty})") } else { ty }
}
