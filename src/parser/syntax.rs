//! Recursive descent over the token stream. Produces the unresolved syntax
//! tree; no name lookup happens here.
use super::lexer::{Tok, Token};
use super::ParseError;
use crate::schema::Literal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `string`, `number`, `any`, `object`, ...
    Keyword(String),
    /// `null`, `undefined`, `void`
    Null,
    Literal(Literal),
    Template { raw: String, pos: Pos },
    Reference { name: String, args: Vec<TypeExpr>, pos: Pos },
    Array(Box<TypeExpr>),
    Tuple(Vec<TupleItem>),
    Object(Vec<Member>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Paren(Box<TypeExpr>),
    /// Shapes with no generation meaning (functions, `keyof`, indexed access).
    Opaque(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleItem {
    pub name: Option<String>,
    pub ty: TypeExpr,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property { name: String, optional: bool, ty: TypeExpr, pos: Pos },
    Index { key_name: String, key: TypeExpr, value: TypeExpr, pos: Pos },
    Method { name: String, pos: Pos },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Interface { name: String, params: Vec<String>, extends: Vec<TypeExpr>, members: Vec<Member>, pos: Pos },
    Alias { name: String, params: Vec<String>, body: TypeExpr, pos: Pos },
    Enum { name: String, members: Vec<EnumMember>, pos: Pos },
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Interface { name, .. } | Decl::Alias { name, .. } | Decl::Enum { name, .. } => name,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Decl::Interface { pos, .. } | Decl::Alias { pos, .. } | Decl::Enum { pos, .. } => *pos,
        }
    }
}

const KEYWORDS: &[&str] = &[
    "string", "number", "boolean", "any", "unknown", "object", "bigint", "symbol", "never",
];

pub struct Parser {
    tokens: Vec<Token>,
    idx: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, idx: 0 }
    }

    // ------------------------------ cursor ------------------------------ //

    fn peek(&self) -> &Tok {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Tok {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens.get((self.idx + offset).min(last)).map(|t| &t.tok).unwrap_or(&Tok::Eof)
    }

    fn pos(&self) -> Pos {
        self.tokens
            .get(self.idx)
            .or_else(|| self.tokens.last())
            .map(|t| Pos { line: t.line, column: t.column })
            .unwrap_or_default()
    }

    fn bump(&mut self) -> Tok {
        let tok = self.peek().clone();
        if self.idx < self.tokens.len() {
            self.idx += 1;
        }
        tok
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == tok {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Tok::Ident(w) if w == word) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn is_ident(&self, word: &str) -> bool {
        matches!(self.peek(), Tok::Ident(w) if w == word)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let pos = self.pos();
        ParseError { line: pos.line, column: pos.column, message: message.into() }
    }

    fn expect(&mut self, tok: Tok, what: &str) -> Result<(), ParseError> {
        if self.eat(&tok) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}, found {}", describe(self.peek()))))
        }
    }

    fn ident(&mut self, what: &str) -> Result<String, ParseError> {
        match self.peek().clone() {
            Tok::Ident(name) => {
                self.bump();
                Ok(name)
            }
            other => Err(self.error(format!("expected {what}, found {}", describe(&other)))),
        }
    }

    /// Skip a balanced group starting at the current opening token.
    fn skip_group(&mut self, open: Tok, close: Tok) -> Result<(), ParseError> {
        self.expect(open.clone(), &describe(&open))?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                Tok::Eof => return Err(self.error(format!("unclosed {}", describe(&open)))),
                t if t == open => depth += 1,
                t if t == close => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    // --------------------------- declarations --------------------------- //

    pub fn parse_file(&mut self) -> Result<Vec<Decl>, ParseError> {
        let mut decls = Vec::new();
        loop {
            while self.eat(&Tok::Semi) {}
            if self.peek() == &Tok::Eof {
                return Ok(decls);
            }
            if self.is_ident("import") {
                self.skip_statement();
                continue;
            }
            while self.eat_ident("export") || self.eat_ident("declare") || self.eat_ident("default") {}
            if self.peek() == &Tok::LBrace {
                // `export { A, B }` re-export lists
                self.skip_group(Tok::LBrace, Tok::RBrace)?;
                self.skip_statement();
                continue;
            }
            let pos = self.pos();
            if self.eat_ident("interface") {
                decls.push(self.parse_interface(pos)?);
            } else if self.eat_ident("type") {
                decls.push(self.parse_alias(pos)?);
            } else if self.eat_ident("enum") {
                decls.push(self.parse_enum(pos)?);
            } else if self.is_ident("const") && matches!(self.peek_at(1), Tok::Ident(w) if w == "enum") {
                self.bump();
                self.bump();
                decls.push(self.parse_enum(pos)?);
            } else {
                return Err(self.error(format!(
                    "expected `interface`, `type` or `enum` declaration, found {}",
                    describe(self.peek())
                )));
            }
        }
    }

    fn skip_statement(&mut self) {
        loop {
            match self.peek() {
                Tok::Eof => return,
                Tok::Semi => {
                    self.bump();
                    return;
                }
                Tok::Ident(w) if matches!(w.as_str(), "interface" | "type" | "enum" | "export" | "declare") => {
                    return;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn parse_type_params(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = Vec::new();
        if !self.eat(&Tok::Lt) {
            return Ok(params);
        }
        loop {
            if self.eat(&Tok::Gt) {
                return Ok(params);
            }
            self.eat_ident("const");
            params.push(self.ident("type parameter")?);
            if self.eat_ident("extends") {
                self.parse_type()?;
            }
            if self.eat(&Tok::Eq) {
                self.parse_type()?;
            }
            if !self.eat(&Tok::Comma) {
                self.expect(Tok::Gt, "`>`")?;
                return Ok(params);
            }
        }
    }

    fn parse_interface(&mut self, pos: Pos) -> Result<Decl, ParseError> {
        let name = self.ident("interface name")?;
        let params = self.parse_type_params()?;
        let mut extends = Vec::new();
        if self.eat_ident("extends") {
            loop {
                extends.push(self.parse_postfix()?);
                if !self.eat(&Tok::Comma) {
                    break;
                }
            }
        }
        let members = self.parse_members()?;
        Ok(Decl::Interface { name, params, extends, members, pos })
    }

    fn parse_alias(&mut self, pos: Pos) -> Result<Decl, ParseError> {
        let name = self.ident("type alias name")?;
        let params = self.parse_type_params()?;
        self.expect(Tok::Eq, "`=`")?;
        let body = self.parse_type()?;
        self.eat(&Tok::Semi);
        Ok(Decl::Alias { name, params, body, pos })
    }

    fn parse_enum(&mut self, pos: Pos) -> Result<Decl, ParseError> {
        let name = self.ident("enum name")?;
        self.expect(Tok::LBrace, "`{`")?;
        let mut members = Vec::new();
        loop {
            if self.eat(&Tok::RBrace) {
                break;
            }
            let member = match self.bump() {
                Tok::Ident(n) | Tok::Str(n) => n,
                other => return Err(self.error(format!("expected enum member, found {}", describe(&other)))),
            };
            let mut value = None;
            if self.eat(&Tok::Eq) {
                value = match self.peek().clone() {
                    Tok::Str(s) => Some(Literal::Str(s)),
                    Tok::Num(n) => Some(Literal::Num(n)),
                    Tok::Minus => match self.peek_at(1).clone() {
                        Tok::Num(n) => {
                            self.bump();
                            Some(Literal::Num(-n))
                        }
                        _ => None,
                    },
                    _ => None,
                };
                // computed initializers are skipped up to the separator
                while !matches!(self.peek(), Tok::Comma | Tok::RBrace | Tok::Eof) {
                    self.bump();
                }
            }
            members.push(EnumMember { name: member, value });
            if !self.eat(&Tok::Comma) {
                self.expect(Tok::RBrace, "`}`")?;
                break;
            }
        }
        Ok(Decl::Enum { name, members, pos })
    }

    // ------------------------------ members ------------------------------ //

    fn parse_members(&mut self) -> Result<Vec<Member>, ParseError> {
        self.expect(Tok::LBrace, "`{`")?;
        let mut members = Vec::new();
        loop {
            while self.eat(&Tok::Semi) || self.eat(&Tok::Comma) {}
            if self.eat(&Tok::RBrace) {
                return Ok(members);
            }
            if self.peek() == &Tok::Eof {
                return Err(self.error("unclosed `{`"));
            }
            members.push(self.parse_member()?);
        }
    }

    fn parse_member(&mut self) -> Result<Member, ParseError> {
        let pos = self.pos();
        // `readonly` is a modifier unless it is itself the property name
        if self.is_ident("readonly")
            && !matches!(self.peek_at(1), Tok::Colon | Tok::Question | Tok::LParen | Tok::Semi | Tok::Comma | Tok::RBrace)
        {
            self.bump();
        }
        if self.eat(&Tok::Minus) {
            // `-readonly` / `-?` in mapped types
            self.eat_ident("readonly");
        }

        if self.peek() == &Tok::LBracket {
            return self.parse_index_member(pos);
        }
        if matches!(self.peek(), Tok::LParen | Tok::Lt) || self.is_ident("new") {
            self.eat_ident("new");
            self.skip_signature()?;
            return Ok(Member::Method { name: "(call)".to_string(), pos });
        }

        let name = match self.bump() {
            Tok::Ident(n) | Tok::Str(n) => n,
            Tok::Num(n) => crate::schema::json_number(n).to_string(),
            other => return Err(self.error(format!("expected property name, found {}", describe(&other)))),
        };
        let optional = self.eat(&Tok::Question);
        if matches!(self.peek(), Tok::LParen | Tok::Lt) {
            self.skip_signature()?;
            return Ok(Member::Method { name, pos });
        }
        let ty = if self.eat(&Tok::Colon) {
            self.parse_type()?
        } else {
            TypeExpr::Keyword("any".to_string())
        };
        Ok(Member::Property { name, optional, ty, pos })
    }

    fn parse_index_member(&mut self, pos: Pos) -> Result<Member, ParseError> {
        self.expect(Tok::LBracket, "`[`")?;
        let key_name = self.ident("index signature parameter")?;
        let key = if self.eat(&Tok::Colon) || self.eat_ident("in") {
            self.parse_type()?
        } else {
            TypeExpr::Keyword("string".to_string())
        };
        if self.eat_ident("as") {
            self.parse_type()?;
        }
        self.expect(Tok::RBracket, "`]`")?;
        self.eat(&Tok::Minus);
        self.eat(&Tok::Question);
        self.expect(Tok::Colon, "`:`")?;
        let value = self.parse_type()?;
        Ok(Member::Index { key_name, key, value, pos })
    }

    /// `<T>(a: A, b?: B): R`: skipped, the return annotation is optional.
    fn skip_signature(&mut self) -> Result<(), ParseError> {
        if self.peek() == &Tok::Lt {
            self.skip_group(Tok::Lt, Tok::Gt)?;
        }
        self.skip_group(Tok::LParen, Tok::RParen)?;
        if self.eat(&Tok::Colon) || self.eat(&Tok::Arrow) {
            self.parse_type()?;
        }
        Ok(())
    }

    // ------------------------------- types ------------------------------- //

    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Tok::Eof => Ok(()),
            other => Err(self.error(format!("unexpected trailing {}", describe(other)))),
        }
    }

    pub fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let check = self.parse_union()?;
        if !self.is_ident("extends") {
            return Ok(check);
        }
        // conditional type: both branches are possible shapes
        self.bump();
        self.parse_union()?;
        self.expect(Tok::Question, "`?`")?;
        let then = self.parse_type()?;
        self.expect(Tok::Colon, "`:`")?;
        let otherwise = self.parse_type()?;
        Ok(TypeExpr::Union(vec![then, otherwise]))
    }

    fn parse_union(&mut self) -> Result<TypeExpr, ParseError> {
        self.eat(&Tok::Pipe);
        let mut members = vec![self.parse_intersection()?];
        while self.eat(&Tok::Pipe) {
            members.push(self.parse_intersection()?);
        }
        Ok(if members.len() == 1 { members.remove(0) } else { TypeExpr::Union(members) })
    }

    fn parse_intersection(&mut self) -> Result<TypeExpr, ParseError> {
        self.eat(&Tok::Amp);
        let mut members = vec![self.parse_prefix()?];
        while self.eat(&Tok::Amp) {
            members.push(self.parse_prefix()?);
        }
        Ok(if members.len() == 1 { members.remove(0) } else { TypeExpr::Intersection(members) })
    }

    fn parse_prefix(&mut self) -> Result<TypeExpr, ParseError> {
        if self.eat_ident("readonly") || self.eat_ident("unique") {
            return self.parse_prefix();
        }
        if self.eat_ident("keyof") {
            let operand = self.parse_prefix()?;
            return Ok(TypeExpr::Opaque(format!("keyof {}", operand.display_name())));
        }
        if self.eat_ident("infer") {
            let name = self.ident("inferred type name")?;
            return Ok(TypeExpr::Opaque(format!("infer {name}")));
        }
        if self.eat_ident("typeof") {
            let path = self.dotted_name()?;
            return Ok(TypeExpr::Opaque(format!("typeof {path}")));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<TypeExpr, ParseError> {
        let mut ty = self.parse_primary()?;
        while self.peek() == &Tok::LBracket {
            self.bump();
            if self.eat(&Tok::RBracket) {
                ty = TypeExpr::Array(Box::new(ty));
            } else {
                let index = self.parse_type()?;
                self.expect(Tok::RBracket, "`]`")?;
                ty = TypeExpr::Opaque(format!("{}[{}]", ty.display_name(), index.display_name()));
            }
        }
        Ok(ty)
    }

    fn parse_primary(&mut self) -> Result<TypeExpr, ParseError> {
        let pos = self.pos();
        match self.peek().clone() {
            Tok::LParen => {
                if self.paren_starts_function() {
                    self.skip_signature()?;
                    return Ok(TypeExpr::Opaque("Function".to_string()));
                }
                self.bump();
                let inner = self.parse_type()?;
                self.expect(Tok::RParen, "`)`")?;
                Ok(TypeExpr::Paren(Box::new(inner)))
            }
            Tok::Lt => {
                self.skip_signature()?;
                Ok(TypeExpr::Opaque("Function".to_string()))
            }
            Tok::LBracket => self.parse_tuple(),
            Tok::LBrace => Ok(TypeExpr::Object(self.parse_members()?)),
            Tok::Str(s) => {
                self.bump();
                Ok(TypeExpr::Literal(Literal::Str(s)))
            }
            Tok::Num(n) => {
                self.bump();
                Ok(TypeExpr::Literal(Literal::Num(n)))
            }
            Tok::Minus => {
                self.bump();
                match self.bump() {
                    Tok::Num(n) => Ok(TypeExpr::Literal(Literal::Num(-n))),
                    other => Err(self.error(format!("expected number after `-`, found {}", describe(&other)))),
                }
            }
            Tok::Template(raw) => {
                self.bump();
                Ok(TypeExpr::Template { raw, pos })
            }
            Tok::Ident(word) => match word.as_str() {
                "true" | "false" => {
                    self.bump();
                    Ok(TypeExpr::Literal(Literal::Bool(word == "true")))
                }
                "null" | "undefined" | "void" => {
                    self.bump();
                    Ok(TypeExpr::Null)
                }
                "new" => {
                    self.bump();
                    self.skip_signature()?;
                    Ok(TypeExpr::Opaque("Function".to_string()))
                }
                w if KEYWORDS.contains(&w) => {
                    self.bump();
                    Ok(TypeExpr::Keyword(word))
                }
                _ => {
                    let name = self.dotted_name()?;
                    let args = self.parse_type_args()?;
                    Ok(TypeExpr::Reference { name, args, pos })
                }
            },
            other => Err(self.error(format!("expected a type, found {}", describe(&other)))),
        }
    }

    fn dotted_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.ident("type name")?;
        while self.peek() == &Tok::Dot {
            self.bump();
            name.push('.');
            name.push_str(&self.ident("qualified name segment")?);
        }
        Ok(name)
    }

    fn parse_type_args(&mut self) -> Result<Vec<TypeExpr>, ParseError> {
        let mut args = Vec::new();
        if !self.eat(&Tok::Lt) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_type()?);
            if !self.eat(&Tok::Comma) {
                break;
            }
        }
        self.expect(Tok::Gt, "`>`")?;
        Ok(args)
    }

    /// Looks past the matching `)` for `=>`.
    fn paren_starts_function(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0usize;
        loop {
            match self.peek_at(offset) {
                Tok::LParen => depth += 1,
                Tok::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.peek_at(offset + 1) == &Tok::Arrow;
                    }
                }
                Tok::Eof => return false,
                _ => {}
            }
            offset += 1;
        }
    }

    fn parse_tuple(&mut self) -> Result<TypeExpr, ParseError> {
        self.expect(Tok::LBracket, "`[`")?;
        let mut items = Vec::new();
        loop {
            if self.eat(&Tok::RBracket) {
                return Ok(TypeExpr::Tuple(items));
            }
            let rest = self.eat(&Tok::Ellipsis);
            let named = matches!(self.peek(), Tok::Ident(_))
                && (self.peek_at(1) == &Tok::Colon
                    || (self.peek_at(1) == &Tok::Question && self.peek_at(2) == &Tok::Colon));
            let mut optional = false;
            let name = if named {
                let name = self.ident("tuple element name")?;
                optional = self.eat(&Tok::Question);
                self.expect(Tok::Colon, "`:`")?;
                Some(name)
            } else {
                None
            };
            let ty = self.parse_type()?;
            optional |= self.eat(&Tok::Question);
            items.push(TupleItem { name, ty, optional, rest });
            if !self.eat(&Tok::Comma) {
                self.expect(Tok::RBracket, "`]`")?;
                return Ok(TypeExpr::Tuple(items));
            }
        }
    }
}

impl TypeExpr {
    /// Short text used in diagnostics and opaque names.
    pub fn display_name(&self) -> String {
        match self {
            TypeExpr::Keyword(k) => k.clone(),
            TypeExpr::Null => "null".to_string(),
            TypeExpr::Literal(lit) => lit.as_key(),
            TypeExpr::Reference { name, .. } => name.clone(),
            TypeExpr::Array(inner) => format!("{}[]", inner.display_name()),
            TypeExpr::Paren(inner) => inner.display_name(),
            TypeExpr::Opaque(text) => text.clone(),
            TypeExpr::Template { .. } => "template".to_string(),
            TypeExpr::Tuple(_) => "tuple".to_string(),
            TypeExpr::Object(_) => "object".to_string(),
            TypeExpr::Union(_) => "union".to_string(),
            TypeExpr::Intersection(_) => "intersection".to_string(),
        }
    }
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::Ident(w) => format!("`{w}`"),
        Tok::Str(s) => format!("string '{s}'"),
        Tok::Num(n) => format!("number {n}"),
        Tok::Template(_) => "template literal".to_string(),
        Tok::LBrace => "`{`".to_string(),
        Tok::RBrace => "`}`".to_string(),
        Tok::LParen => "`(`".to_string(),
        Tok::RParen => "`)`".to_string(),
        Tok::LBracket => "`[`".to_string(),
        Tok::RBracket => "`]`".to_string(),
        Tok::Lt => "`<`".to_string(),
        Tok::Gt => "`>`".to_string(),
        Tok::Comma => "`,`".to_string(),
        Tok::Semi => "`;`".to_string(),
        Tok::Colon => "`:`".to_string(),
        Tok::Question => "`?`".to_string(),
        Tok::Pipe => "`|`".to_string(),
        Tok::Amp => "`&`".to_string(),
        Tok::Eq => "`=`".to_string(),
        Tok::Dot => "`.`".to_string(),
        Tok::Ellipsis => "`...`".to_string(),
        Tok::Arrow => "`=>`".to_string(),
        Tok::Minus => "`-`".to_string(),
        Tok::Eof => "end of input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse(src: &str) -> Vec<Decl> {
        Parser::new(tokenize(src).unwrap()).parse_file().unwrap()
    }

    fn alias_body(src: &str) -> TypeExpr {
        match parse(src).remove(0) {
            Decl::Alias { body, .. } => body,
            other => panic!("expected alias, got {other:?}"),
        }
    }

    #[test]
    fn interface_members_and_modifiers() {
        let decls = parse(
            "export interface User extends Base<T> {\n  readonly id: string;\n  nick?: string,\n  greet(x: number): void\n  'x-y': number\n}",
        );
        let Decl::Interface { name, extends, members, .. } = &decls[0] else { panic!() };
        assert_eq!(name, "User");
        assert_eq!(extends.len(), 1);
        assert_eq!(members.len(), 4);
        assert!(matches!(&members[1], Member::Property { name, optional: true, .. } if name == "nick"));
        assert!(matches!(&members[2], Member::Method { name, .. } if name == "greet"));
        assert!(matches!(&members[3], Member::Property { name, .. } if name == "x-y"));
    }

    #[test]
    fn union_binds_looser_than_intersection_and_array() {
        let body = alias_body("type A = | B & C | D[]");
        let TypeExpr::Union(members) = body else { panic!() };
        assert!(matches!(members[0], TypeExpr::Intersection(_)));
        assert!(matches!(members[1], TypeExpr::Array(_)));
    }

    #[test]
    fn named_and_optional_tuple_elements() {
        let TypeExpr::Tuple(items) = alias_body("type P = [x: number, label?: string, ...rest: boolean[]]") else {
            panic!()
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name.as_deref(), Some("x"));
        assert!(items[1].optional);
        assert!(items[2].rest);
    }

    #[test]
    fn function_types_are_opaque() {
        assert_eq!(alias_body("type F = (a: string) => void"), TypeExpr::Opaque("Function".into()));
        assert!(matches!(alias_body("type G = (string)"), TypeExpr::Paren(_)));
    }

    #[test]
    fn enums_keep_initializers() {
        let Decl::Enum { members, .. } = &parse("const enum Dir { Up = 1, Down, Left = 'L', Neg = -2 }")[0] else {
            panic!()
        };
        assert_eq!(members[0].value, Some(Literal::Num(1.0)));
        assert_eq!(members[1].value, None);
        assert_eq!(members[2].value, Some(Literal::Str("L".into())));
        assert_eq!(members[3].value, Some(Literal::Num(-2.0)));
    }

    #[test]
    fn index_signature_member() {
        let TypeExpr::Object(members) = alias_body("type D = { [userId: string]: number }") else { panic!() };
        assert!(matches!(&members[0], Member::Index { key_name, .. } if key_name == "userId"));
    }

    #[test]
    fn garbage_reports_position() {
        let err = Parser::new(tokenize("interface A { x: }").unwrap()).parse_file().unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 18);
    }
}
