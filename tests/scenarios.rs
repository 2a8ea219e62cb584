use serde_json::Value;
use typemock::generate::{GenerateConfig, GenerateError, generate};
use typemock::inference::infer_declarations;
use typemock::parser::parse_declarations;
use typemock::validate::validate;

fn run(source: &str, quantity: usize, seed: u64) -> Vec<Value> {
    let decls = parse_declarations(source).expect("source parses");
    let config = GenerateConfig { quantity, seed: Some(seed), root: None };
    generate(&decls, &config).expect("generation succeeds").values
}

const CATALOG: &str = r#"
type Category = 'shoes' | 'hats' | 'bags';
type Size = 'S' | 'M' | 'L';

export interface Product {
  id: string;
  sku: `${Category}-${number}-${Size}`;
  category: Category;
  price: number;
  tags: string[];
  dims: [width: number, height: number];
  stock: Record<string, number>;
  discount?: number;
  supplier: Supplier;
  createdAt: Date;
}

interface Supplier {
  name: string;
  email: string;
  country: string;
}
"#;

#[test]
fn explicit_seed_is_deterministic() {
    assert_eq!(run(CATALOG, 20, 1234), run(CATALOG, 20, 1234));
}

#[test]
fn quantity_contract_holds() {
    for n in [1, 2, 7, 50] {
        assert_eq!(run(CATALOG, n, 5).len(), n);
    }
    let decls = parse_declarations(CATALOG).unwrap();
    let zero = GenerateConfig { quantity: 0, seed: Some(1), root: None };
    assert_eq!(generate(&decls, &zero).unwrap_err(), GenerateError::InvalidQuantity);
}

#[test]
fn optional_property_present_about_seventy_percent() {
    let values = run("interface A { always: string; maybe?: number }", 10_000, 77);
    let present = values.iter().filter(|v| v.get("maybe").is_some()).count();
    let ratio = present as f64 / values.len() as f64;
    assert!((0.67..=0.73).contains(&ratio), "presence ratio {ratio}");
    assert!(values.iter().all(|v| v["always"].is_string()));
}

#[test]
fn literal_union_is_closed() {
    for v in run("interface A { pick: 'a' | 'b' | 'c' }", 500, 3) {
        assert!(["a", "b", "c"].contains(&v["pick"].as_str().unwrap()), "{v}");
    }
}

#[test]
fn tuple_has_declared_shape() {
    for v in run("interface T { pair: [string, number] }", 200, 9) {
        let pair = v["pair"].as_array().unwrap();
        assert_eq!(pair.len(), 2);
        assert!(pair[0].is_string() && pair[1].is_number());
    }
}

#[test]
fn record_size_is_bounded() {
    for v in run("interface R { counts: Record<string, number> }", 200, 10) {
        let counts = v["counts"].as_object().unwrap();
        assert!((2..=5).contains(&counts.len()), "{v}");
        assert!(counts.values().all(Value::is_number));
    }
}

#[test]
fn pick_and_omit_are_complements() {
    let src = "interface E { x: string; y: number; z: boolean }\ninterface Q { p: Pick<E, 'x' | 'y'>; o: Omit<E, 'x' | 'y'> }";
    for v in run(src, 100, 12) {
        let picked: Vec<&String> = v["p"].as_object().unwrap().keys().collect();
        let omitted: Vec<&String> = v["o"].as_object().unwrap().keys().collect();
        assert_eq!(picked, vec!["x", "y"]);
        assert_eq!(omitted, vec!["z"]);
    }
}

#[test]
fn user_round_trip_with_seed_42() {
    let src = "interface User { id: string; age: number; role: 'admin' | 'user' }";
    let first = run(src, 2, 42);
    assert_eq!(first, run(src, 2, 42));
    assert_eq!(first.len(), 2);
    for user in &first {
        assert!(user["id"].is_string());
        let age = user["age"].as_i64().expect("integer age");
        assert!((18..=80).contains(&age));
        assert!(["admin", "user"].contains(&user["role"].as_str().unwrap()));
    }
}

#[test]
fn template_fills_every_placeholder() {
    for product in run(CATALOG, 200, 21) {
        let sku = product["sku"].as_str().unwrap();
        let parts: Vec<&str> = sku.split('-').collect();
        assert_eq!(parts.len(), 3, "{sku}");
        assert!(["shoes", "hats", "bags"].contains(&parts[0]), "{sku}");
        assert!(!parts[1].is_empty() && parts[1].chars().all(|c| c.is_ascii_digit()), "{sku}");
        assert!(["S", "M", "L"].contains(&parts[2]), "{sku}");
    }
}

#[test]
fn unresolved_symbol_becomes_null() {
    let values = run("interface Order { id: string; customer: Customer; notes?: string }", 10, 2);
    for order in values {
        assert!(order["customer"].is_null());
        assert!(order["id"].is_string());
    }
}

#[test]
fn catalog_values_follow_field_semantics() {
    for product in run(CATALOG, 50, 8) {
        assert!(!product["id"].as_str().unwrap().is_empty());
        assert!(product["price"].is_number());
        assert!(product["supplier"]["email"].as_str().unwrap().contains('@'));
        assert_eq!(product["dims"].as_array().unwrap().len(), 2);
        let created = product["createdAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok(), "{created}");
    }
}

#[test]
fn validation_is_advisory() {
    let src = "interface A { b: Missing; c: string }";
    let report = validate(src);
    assert!(!report.valid);
    assert_eq!(report.diagnostics[0].message, "Cannot find name 'Missing'.");
    assert_eq!(run(src, 1, 1)[0]["b"], Value::Null);
    assert!(validate(CATALOG).valid, "{:?}", validate(CATALOG).diagnostics);
}

#[test]
fn inferred_declarations_generate_matching_shapes() {
    let samples = run(CATALOG, 30, 99);
    let inferred = infer_declarations(&samples, "Product").unwrap();
    let regenerated = run(&inferred, 30, 99);
    for value in regenerated {
        let object = value.as_object().unwrap();
        for key in ["id", "sku", "category", "price", "tags", "dims", "stock", "supplier", "createdAt"] {
            assert!(object.contains_key(key), "{key} missing from {value}\n{inferred}");
        }
        assert!(value["supplier"]["email"].is_string());
    }
}
