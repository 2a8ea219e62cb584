//! Parsed type model. No source syntax here, only resolved shapes.
use indexmap::IndexMap;
use serde::Serialize;

/// Reserved property key under which an alias declaration stores its type.
pub const ALIAS_KEY: &str = "$alias";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeNode {
    /// Literal spelling: keyword, referenced identifier, or structural tag.
    pub name: String,
    #[serde(flatten)]
    pub kind: Kind,
    /// Alias name seen at the reference site; beats the field name for leaves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    /// Index-signature key parameter name, used for record keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Kind {
    String,
    Number,
    Boolean,
    Date,
    Array { element: Box<TypeNode> },
    Object { members: IndexMap<String, Property> },
    Enum { values: Vec<Literal> },
    Union { members: Vec<TypeNode> },
    Intersection { members: Vec<TypeNode> },
    Literal { value: Literal },
    Template { pattern: String },
    Tuple { elements: Vec<TupleElement> },
    Map { key: Box<TypeNode>, value: Box<TypeNode> },
    Set { element: Box<TypeNode> },
    Utility { tag: Utility, args: Vec<TypeNode> },
    /// Unresolved name; a forward reference when a declaration matches.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub ty: TypeNode,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TupleElement {
    #[serde(rename = "type")]
    pub ty: TypeNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    /// `...T[]`: the generated items are spliced into the tuple.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Utility {
    Partial,
    Required,
    Readonly,
    Record,
    Pick,
    Omit,
    Lowercase,
    Uppercase,
    Capitalize,
    Uncapitalize,
    Promise,
    Awaited,
    NonNullable,
    Exclude,
    Extract,
}

impl Utility {
    pub fn from_name(name: &str) -> Option<Self> {
        let tag = match name {
            "Partial" => Self::Partial,
            "Required" => Self::Required,
            "Readonly" => Self::Readonly,
            "Record" => Self::Record,
            "Pick" => Self::Pick,
            "Omit" => Self::Omit,
            "Lowercase" => Self::Lowercase,
            "Uppercase" => Self::Uppercase,
            "Capitalize" => Self::Capitalize,
            "Uncapitalize" => Self::Uncapitalize,
            "Promise" => Self::Promise,
            "Awaited" => Self::Awaited,
            "NonNullable" => Self::NonNullable,
            "Exclude" => Self::Exclude,
            "Extract" => Self::Extract,
            _ => return None,
        };
        Some(tag)
    }
}

impl Literal {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Str(s) => serde_json::Value::from(s.clone()),
            Literal::Num(n) => json_number(*n),
            Literal::Bool(b) => serde_json::Value::from(*b),
            Literal::Null => serde_json::Value::Null,
        }
    }

    /// Text form used for key-set membership (Pick/Omit and friends).
    pub fn as_key(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            Literal::Num(n) => json_number(*n).to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Null => "null".to_string(),
        }
    }
}

/// Prefer an integer JSON number when the float is integral.
pub fn json_number(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl TypeNode {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self { name: name.into(), kind, type_hint: None, key_hint: None }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Unknown)
    }

    pub fn primitive(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "string" => Kind::String,
            "number" => Kind::Number,
            "boolean" => Kind::Boolean,
            _ => return None,
        };
        Some(Self::new(keyword, kind))
    }

    pub fn literal(value: Literal) -> Self {
        Self::new("literal", Kind::Literal { value })
    }

    pub fn with_type_hint(mut self, hint: impl Into<String>) -> Self {
        self.type_hint = Some(hint.into());
        self
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, Kind::Unknown)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, Kind::String | Kind::Number | Kind::Boolean | Kind::Date)
    }

    /// The name this node would contribute as a hint on its own: its alias
    /// hint, or the reference name for an unresolved reference.
    pub fn own_hint(&self) -> Option<&str> {
        if let Some(hint) = self.type_hint.as_deref() {
            return Some(hint);
        }
        match self.kind {
            Kind::Unknown => Some(self.name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDeclaration {
    pub name: String,
    pub properties: IndexMap<String, Property>,
}

impl SchemaDeclaration {
    pub fn entity(name: impl Into<String>, properties: IndexMap<String, Property>) -> Self {
        Self { name: name.into(), properties }
    }

    pub fn alias(name: impl Into<String>, ty: TypeNode) -> Self {
        let mut properties = IndexMap::new();
        properties.insert(ALIAS_KEY.to_string(), Property { ty, optional: false });
        Self { name: name.into(), properties }
    }

    /// The wrapped node when this is an alias declaration.
    pub fn alias_target(&self) -> Option<&TypeNode> {
        if self.properties.len() != 1 {
            return None;
        }
        self.properties.get(ALIAS_KEY).map(|p| &p.ty)
    }

    pub fn is_entity(&self) -> bool {
        self.alias_target().is_none()
    }
}

/// Name lookup over a parsed declaration list.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationTable<'a> {
    declarations: &'a [SchemaDeclaration],
}

impl<'a> DeclarationTable<'a> {
    pub fn new(declarations: &'a [SchemaDeclaration]) -> Self {
        Self { declarations }
    }

    pub fn get(&self, name: &str) -> Option<&'a SchemaDeclaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn declarations(&self) -> &'a [SchemaDeclaration] {
        self.declarations
    }
}
