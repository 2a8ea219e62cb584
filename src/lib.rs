//! Seeded mock JSON from TypeScript-style type declarations.
//!
//! [`parser::parse_declarations`] turns declaration source into
//! [`schema::SchemaDeclaration`]s; [`generate::generate`] instantiates the
//! root declaration into JSON values from a single seeded stream.
//! [`inference::infer_declarations`] goes the other way, from example JSON
//! to declaration source.
pub mod cli;
pub mod config;
pub mod generate;
pub mod inference;
pub mod parser;
pub mod schema;
pub mod validate;
