//! Declaration source -> [`SchemaDeclaration`]s.
//!
//! The parser is permissive: anything it can structurally walk is accepted,
//! whether or not a strict type checker would agree. Only text it cannot
//! interpret at all fails, with a [`ParseError`] carrying the position.
pub mod lexer;
pub mod resolve;
pub mod syntax;

use thiserror::Error;

use crate::schema::{SchemaDeclaration, TypeNode};
use lexer::tokenize;
use resolve::Resolver;
use syntax::{Decl, Parser};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Syntax tree only; shared with validation.
pub fn parse_syntax(source: &str) -> Result<Vec<Decl>, ParseError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_file()
}

pub fn parse_declarations(source: &str) -> Result<Vec<SchemaDeclaration>, ParseError> {
    let decls = parse_syntax(source)?;
    let mut resolver = Resolver::collect(&decls);
    Ok(resolver.declarations(&decls))
}

/// A standalone type expression with no alias table: every name stays an
/// `unknown` reference to be resolved against declarations later.
pub fn parse_type_expr(text: &str) -> Result<TypeNode, ParseError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_type()?;
    parser.expect_end()?;
    Ok(Resolver::empty().resolve(&expr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Kind, Utility};

    #[test]
    fn standalone_expression_keeps_references() {
        let node = parse_type_expr("Uppercase<Size>").unwrap();
        let Kind::Utility { tag, args } = node.kind else { panic!() };
        assert_eq!(tag, Utility::Uppercase);
        assert_eq!(args[0].name, "Size");

        let node = parse_type_expr("Size").unwrap();
        assert!(node.is_unknown());
        assert!(parse_type_expr("Size Size").is_err());
    }

    #[test]
    fn error_display_carries_position() {
        let err = parse_declarations("interface {").unwrap_err();
        assert_eq!(err.to_string(), "1:11: expected interface name, found `{`");
    }

    #[test]
    fn exponent_literals_parse() {
        let decls = parse_declarations("interface A { x: 1e-5; y: 2.5E+2 }").unwrap();
        let x = &decls[0].properties["x"].ty;
        assert_eq!(x.kind, Kind::Literal { value: crate::schema::Literal::Num(1e-5) });
        let y = &decls[0].properties["y"].ty;
        assert_eq!(y.kind, Kind::Literal { value: crate::schema::Literal::Num(250.0) });
    }

    #[test]
    fn declarations_keep_source_order() {
        let decls = parse_declarations("type B = number;\ninterface A { b: B }\nenum C { X }").unwrap();
        let names: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }
}
