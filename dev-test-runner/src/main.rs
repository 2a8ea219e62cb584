//! Generates mock records and checks that a typed consumer can deserialize
//! every one of them. Mismatches report the JSON path of the failing field.
use serde::Deserialize;
use typemock::generate::{GenerateConfig, generate};
use typemock::parser::parse_declarations;

const SCHEMA: &str = r#"
type Role = 'admin' | 'editor' | 'viewer';

interface Account {
  id: string;
  email: string;
  age: number;
  role: Role;
  tags: string[];
  location: [latitude: number, longitude: number];
  profile?: Profile;
}

interface Profile {
  firstName: string;
  lastName: string;
  website?: string;
}
"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct Account {
    id: String,
    email: String,
    age: u8,
    role: Role,
    tags: Vec<String>,
    location: (f64, f64),
    profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    Admin,
    Editor,
    Viewer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(dead_code)]
struct Profile {
    first_name: String,
    last_name: String,
    website: Option<String>,
}

fn main() {
    let decls = match parse_declarations(SCHEMA) {
        Ok(decls) => decls,
        Err(error) => {
            eprintln!("❌ schema: {error}");
            std::process::exit(1);
        }
    };
    let config = GenerateConfig { quantity: 500, seed: None, root: None };
    let output = match generate(&decls, &config) {
        Ok(output) => output,
        Err(error) => {
            eprintln!("❌ generate: {error}");
            std::process::exit(1);
        }
    };
    let mut failures = 0usize;
    for value in &output.values {
        let json_source = value.to_string();
        let de = &mut serde_json::Deserializer::from_str(&json_source);
        if let Err(error) = serde_path_to_error::deserialize::<_, Account>(de) {
            failures += 1;
            eprintln!("❌ at {} → {}\n   {json_source}", error.path(), error.inner());
        }
    }
    eprintln!("seed {}: {} records, {failures} failed", output.seed, output.values.len());
    if failures > 0 {
        std::process::exit(1);
    }
    eprintln!("✅ success");
}
