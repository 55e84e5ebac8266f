//! Name- and type-aware fake value generation for `FieldPhase`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use fake::faker::address::en::StreetAddress;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::{Fake, Faker};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::model::attribute::{Attribute, DataType};

const STATUS_CHOICES: [&str; 3] = ["active", "inactive", "pending"];

/// Produces a fake cell value for `attribute`, checking name-pattern
/// heuristics first and falling back to a type heuristic.
pub fn fake_value_for(attribute: &Attribute, rng: &mut ChaCha8Rng) -> String {
    let lower = attribute.name.to_ascii_lowercase();

    if lower.contains("email") {
        return SafeEmail().fake_with_rng(rng);
    }
    if lower.contains("name") {
        return Name().fake_with_rng(rng);
    }
    if lower.contains("phone") {
        return PhoneNumber().fake_with_rng(rng);
    }
    if lower.contains("address") {
        return StreetAddress().fake_with_rng(rng);
    }
    if lower.contains("status") {
        let index = rng.gen_range(0..STATUS_CHOICES.len());
        return STATUS_CHOICES[index].to_string();
    }
    if lower.contains("date") || lower.contains("time") {
        return rfc3339_timestamp(rng);
    }

    match attribute.data_type {
        DataType::Integer => rng.gen_range(1..=1000).to_string(),
        DataType::Boolean => if rng.gen_bool(0.5) { "true" } else { "false" }.to_string(),
        DataType::Date => iso_date(rng),
        DataType::DateTime => rfc3339_timestamp(rng),
        DataType::Float | DataType::Double => format!("{:.2}", rng.gen_range(1.0..=100.0)),
        DataType::String | DataType::Other => lowercase_word(rng),
    }
}

/// `YYYY-MM-DD`, drawn via `fake`'s `chrono` feature rather than hand-rolled
/// arithmetic — the crate already carries both dependencies for this.
fn iso_date(rng: &mut ChaCha8Rng) -> String {
    let date: NaiveDate = Faker.fake_with_rng(rng);
    date.format("%Y-%m-%d").to_string()
}

/// RFC3339 with a literal `Z` offset (`to_rfc3339_opts` with `use_z = true`).
fn rfc3339_timestamp(rng: &mut ChaCha8Rng) -> String {
    let dt: DateTime<Utc> = Faker.fake_with_rng(rng);
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

const WORD_SYLLABLES: [&str; 12] = [
    "ab", "er", "on", "ix", "ul", "ra", "mo", "ti", "ze", "qua", "ny", "fen",
];

fn lowercase_word(rng: &mut ChaCha8Rng) -> String {
    let syllable_count = rng.gen_range(2..=3);
    (0..syllable_count)
        .map(|_| WORD_SYLLABLES[rng.gen_range(0..WORD_SYLLABLES.len())])
        .collect()
}
