//! Field-name heuristics for primitive leaves.
//!
//! The hint (alias name if present, else field name) is lowercased with
//! `_`, `-`, spaces and dots removed, then matched by substring containment
//! against an ordered table. First match wins, so specific substrings
//! ("username") must precede general ones ("name").
use chrono::SecondsFormat;
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, CountryName, StateName, StreetName, ZipCode};
use fake::faker::company::en::{CompanyName, Industry, Profession};
use fake::faker::currency::en::CurrencyCode;
use fake::faker::internet::en::{DomainSuffix, IPv4, Password, SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringStrategy {
    Uuid,
    Username,
    Email,
    FirstName,
    LastName,
    FullName,
    Phone,
    Password,
    ImageUrl,
    Url,
    Ipv4,
    Street,
    City,
    State,
    Country,
    PostalCode,
    Company,
    Department,
    JobTitle,
    Currency,
    Price,
    Color,
    DateTime,
    Title,
    Paragraph,
    Sentence,
    Slug,
    Identifier,
    Word,
}

const STRING_TABLE: &[(&[&str], StringStrategy)] = &[
    (&["uuid", "guid"], StringStrategy::Uuid),
    (&["username", "login", "handle", "nickname"], StringStrategy::Username),
    (&["email", "mail"], StringStrategy::Email),
    (&["firstname", "givenname", "forename"], StringStrategy::FirstName),
    (&["lastname", "surname", "familyname"], StringStrategy::LastName),
    (&["fullname", "displayname", "author"], StringStrategy::FullName),
    (&["phone", "mobile", "fax"], StringStrategy::Phone),
    (&["password", "passwd", "secret"], StringStrategy::Password),
    (&["avatar", "image", "photo", "picture", "thumbnail", "logo", "icon"], StringStrategy::ImageUrl),
    (&["url", "website", "link", "href", "uri", "homepage"], StringStrategy::Url),
    (&["ipaddress", "ipaddr", "ipv4"], StringStrategy::Ipv4),
    (&["street", "address"], StringStrategy::Street),
    (&["city", "town"], StringStrategy::City),
    (&["state", "province", "region"], StringStrategy::State),
    (&["country", "nation"], StringStrategy::Country),
    (&["zip", "postal", "postcode"], StringStrategy::PostalCode),
    (&["company", "organization", "organisation", "employer", "business"], StringStrategy::Company),
    (&["department", "industry", "division"], StringStrategy::Department),
    (&["jobtitle", "occupation", "profession", "position"], StringStrategy::JobTitle),
    (&["currency"], StringStrategy::Currency),
    (&["price", "amount", "cost", "total", "salary", "balance", "fee"], StringStrategy::Price),
    (&["color", "colour"], StringStrategy::Color),
    (
        &["date", "time", "createdat", "updatedat", "deletedat", "birthday", "dob"],
        StringStrategy::DateTime,
    ),
    (&["title", "subject", "headline", "caption", "heading"], StringStrategy::Title),
    (&["description", "bio", "summary", "about", "content", "body"], StringStrategy::Paragraph),
    (&["comment", "message", "note", "text", "review"], StringStrategy::Sentence),
    (&["name"], StringStrategy::FullName),
    (&["slug"], StringStrategy::Slug),
    (&["id", "code", "key", "sku", "token", "ref", "hash"], StringStrategy::Identifier),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStrategy {
    Percent,
    Count,
    Age,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Latitude,
    Longitude,
    Price,
    Rating,
    Measure,
    Identifier,
    Integer,
}

const NUMBER_TABLE: &[(&[&str], NumberStrategy)] = &[
    (&["percent", "ratio", "rate", "progress"], NumberStrategy::Percent),
    (&["page", "limit", "offset", "count", "quantity", "qty", "stock"], NumberStrategy::Count),
    (&["age"], NumberStrategy::Age),
    (&["year"], NumberStrategy::Year),
    (&["month"], NumberStrategy::Month),
    (&["day"], NumberStrategy::Day),
    (&["hour"], NumberStrategy::Hour),
    (&["minute", "second"], NumberStrategy::Minute),
    (&["latitude"], NumberStrategy::Latitude),
    (&["longitude", "lng"], NumberStrategy::Longitude),
    (&["price", "amount", "cost", "total", "salary", "balance", "fee", "revenue"], NumberStrategy::Price),
    (&["rating", "score", "stars"], NumberStrategy::Rating),
    (&["weight", "height", "width", "length", "size", "distance"], NumberStrategy::Measure),
    (&["id", "number", "num", "index", "code"], NumberStrategy::Identifier),
];

pub fn normalize_hint(hint: &str) -> String {
    hint.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' ' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn lookup<T: Copy>(table: &[(&[&str], T)], hint: &str) -> Option<T> {
    let hint = normalize_hint(hint);
    table
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| hint.contains(n)))
        .map(|(_, strategy)| *strategy)
}

pub fn string_strategy(hint: &str) -> StringStrategy {
    lookup(STRING_TABLE, hint).unwrap_or(StringStrategy::Word)
}

pub fn number_strategy(hint: &str) -> NumberStrategy {
    lookup(NUMBER_TABLE, hint).unwrap_or(NumberStrategy::Integer)
}

pub fn choose_string_value<R: Rng>(hint: &str, rng: &mut R) -> String {
    match string_strategy(hint) {
        StringStrategy::Uuid => {
            let mut bytes = [0u8; 16];
            rng.fill(&mut bytes);
            uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
        }
        StringStrategy::Username => Username().fake_with_rng(rng),
        StringStrategy::Email => SafeEmail().fake_with_rng(rng),
        StringStrategy::FirstName => FirstName().fake_with_rng(rng),
        StringStrategy::LastName => LastName().fake_with_rng(rng),
        StringStrategy::FullName => Name().fake_with_rng(rng),
        StringStrategy::Phone => PhoneNumber().fake_with_rng(rng),
        StringStrategy::Password => Password(10..16).fake_with_rng(rng),
        StringStrategy::ImageUrl => {
            let seed: String = Word().fake_with_rng(rng);
            format!("https://picsum.photos/seed/{seed}/400/300")
        }
        StringStrategy::Url => {
            let host: String = Word().fake_with_rng(rng);
            let suffix: String = DomainSuffix().fake_with_rng(rng);
            let path: String = Word().fake_with_rng(rng);
            format!("https://www.{host}.{suffix}/{path}")
        }
        StringStrategy::Ipv4 => IPv4().fake_with_rng(rng),
        StringStrategy::Street => {
            let number: String = BuildingNumber().fake_with_rng(rng);
            let street: String = StreetName().fake_with_rng(rng);
            format!("{number} {street}")
        }
        StringStrategy::City => CityName().fake_with_rng(rng),
        StringStrategy::State => StateName().fake_with_rng(rng),
        StringStrategy::Country => CountryName().fake_with_rng(rng),
        StringStrategy::PostalCode => ZipCode().fake_with_rng(rng),
        StringStrategy::Company => CompanyName().fake_with_rng(rng),
        StringStrategy::Department => Industry().fake_with_rng(rng),
        StringStrategy::JobTitle => Profession().fake_with_rng(rng),
        StringStrategy::Currency => CurrencyCode().fake_with_rng(rng),
        StringStrategy::Price => format!("{:.2}", rng.gen_range(1.0..1000.0)),
        StringStrategy::Color => format!("#{:06x}", rng.gen_range(0..=0xFF_FFFFu32)),
        StringStrategy::DateTime => date_value(rng),
        StringStrategy::Title => {
            let words: Vec<String> = Words(2..5).fake_with_rng(rng);
            capitalize(&words.join(" "))
        }
        StringStrategy::Paragraph => Paragraph(1..3).fake_with_rng(rng),
        StringStrategy::Sentence => Sentence(4..12).fake_with_rng(rng),
        StringStrategy::Slug => {
            let words: Vec<String> = Words(2..4).fake_with_rng(rng);
            words.join("-")
        }
        StringStrategy::Identifier => (0..10).map(|_| char::from(rng.sample(Alphanumeric))).collect(),
        StringStrategy::Word => Word().fake_with_rng(rng),
    }
}

pub fn choose_number_value<R: Rng>(hint: &str, rng: &mut R) -> Value {
    let int = |v: i64| Value::from(v);
    let frac = |v: f64| crate::schema::json_number((v * 100.0).round() / 100.0);
    match number_strategy(hint) {
        NumberStrategy::Percent => int(rng.gen_range(0..=100)),
        NumberStrategy::Count => int(rng.gen_range(0..=100)),
        NumberStrategy::Age => int(rng.gen_range(18..=80)),
        NumberStrategy::Year => int(rng.gen_range(1990..=2030)),
        NumberStrategy::Month => int(rng.gen_range(1..=12)),
        NumberStrategy::Day => int(rng.gen_range(1..=28)),
        NumberStrategy::Hour => int(rng.gen_range(0..=23)),
        NumberStrategy::Minute => int(rng.gen_range(0..=59)),
        NumberStrategy::Latitude => frac(rng.gen_range(-90.0..=90.0)),
        NumberStrategy::Longitude => frac(rng.gen_range(-180.0..=180.0)),
        NumberStrategy::Price => frac(rng.gen_range(1.0..1000.0)),
        NumberStrategy::Rating => {
            let tenths: i64 = rng.gen_range(10..=50);
            crate::schema::json_number(tenths as f64 / 10.0)
        }
        NumberStrategy::Measure => int(rng.gen_range(1..=200)),
        NumberStrategy::Identifier => int(rng.gen_range(1..=100_000)),
        NumberStrategy::Integer => int(rng.gen_range(0..=1000)),
    }
}

/// 2020-01-01T00:00:00.000Z ..= 2025-12-31T23:59:59.999Z
const DATE_RANGE_MS: std::ops::RangeInclusive<i64> = 1_577_836_800_000..=1_767_225_599_999;

pub fn date_value<R: Rng>(rng: &mut R) -> String {
    let millis = rng.gen_range(DATE_RANGE_MS);
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| "2020-01-01T00:00:00.000Z".to_string())
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn specific_substrings_win_over_general_ones() {
        assert_eq!(string_strategy("username"), StringStrategy::Username);
        assert_eq!(string_strategy("user_name"), StringStrategy::Username);
        assert_eq!(string_strategy("firstName"), StringStrategy::FirstName);
        assert_eq!(string_strategy("name"), StringStrategy::FullName);
        assert_eq!(string_strategy("emailAddress"), StringStrategy::Email);
        assert_eq!(string_strategy("homeAddress"), StringStrategy::Street);
        assert_eq!(string_strategy("userId"), StringStrategy::Identifier);
        assert_eq!(string_strategy("zzz"), StringStrategy::Word);
    }

    #[test]
    fn number_categories() {
        assert_eq!(number_strategy("age"), NumberStrategy::Age);
        assert_eq!(number_strategy("percentage"), NumberStrategy::Percent);
        assert_eq!(number_strategy("pageSize"), NumberStrategy::Count);
        assert_eq!(number_strategy("unitPrice"), NumberStrategy::Price);
        assert_eq!(number_strategy("sku"), NumberStrategy::Integer);
    }

    #[test]
    fn age_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let age = choose_number_value("age", &mut rng).as_i64().unwrap();
            assert!((18..=80).contains(&age));
        }
    }

    #[test]
    fn dates_are_rfc3339_utc() {
        let mut rng = StdRng::seed_from_u64(1);
        let date = date_value(&mut rng);
        let parsed = chrono::DateTime::parse_from_rfc3339(&date).unwrap();
        assert!(parsed.timestamp_millis() >= *DATE_RANGE_MS.start());
        assert!(date.ends_with('Z'));
    }

    #[test]
    fn uuids_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(3);
        let id = choose_string_value("uuid", &mut rng);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn case_helpers() {
        assert_eq!(capitalize("hello"), "Hello");
        assert_eq!(uncapitalize("World"), "world");
        assert_eq!(capitalize(""), "");
    }
}
