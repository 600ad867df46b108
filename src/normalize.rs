// Normalization of loosely shaped catalog records into NormalizedVehicle.
// Each field is read from an ordered list of candidate keys; the first usable
// value wins, otherwise the field default applies. Never fails.

use chrono::Datelike;
use serde_json::Value;

use crate::models::{FuelType, NormalizedVehicle, RawVehicleRecord, Transmission, VehicleId};

const TITLE_FIELDS: &[&str] = &["title", "name"];
const BRAND_FIELDS: &[&str] = &["brand", "make"];
const MODEL_FIELDS: &[&str] = &["model"];
const YEAR_FIELDS: &[&str] = &["year"];
const PRICE_FIELDS: &[&str] = &["price"];
const IMAGE_FIELDS: &[&str] = &["image", "imageUrl"];
const LOCATION_FIELDS: &[&str] = &["location", "city"];
const DESCRIPTION_FIELDS: &[&str] = &["description"];
const FUEL_FIELDS: &[&str] = &["fuelType"];
const TRANSMISSION_FIELDS: &[&str] = &["transmission"];
const MILEAGE_FIELDS: &[&str] = &["mileage"];

pub const DEFAULT_BRAND: &str = "Generic";
pub const DEFAULT_MODEL: &str = "Unknown";
pub const DEFAULT_LOCATION: &str = "Available Online";
pub const DEFAULT_DESCRIPTION: &str = "No description available for this vehicle.";

const PLACEHOLDER_IMAGE_BASE: &str = "https://picsum.photos/seed";
const GALLERY_SUFFIXES: [&str; 3] = ["side", "rear", "int"];

pub const MILEAGE_DEFAULT_MIN: u64 = 1_000;
pub const MILEAGE_DEFAULT_SPAN: u64 = 50_000;

/// Normalizes a single record. A record without an id gets `"unknown"`.
pub fn normalize(raw: &RawVehicleRecord) -> NormalizedVehicle {
    normalize_with_fallback_id(raw, VehicleId::Text("unknown".to_string()))
}

/// Normalizes a whole response, preserving order. Records without an id get
/// `listing-{n}` (1-based position) so ids stay unique within the batch.
pub fn normalize_batch(records: &[RawVehicleRecord]) -> Vec<NormalizedVehicle> {
    records
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            normalize_with_fallback_id(raw, VehicleId::Text(format!("listing-{}", index + 1)))
        })
        .collect()
}

fn normalize_with_fallback_id(raw: &RawVehicleRecord, fallback_id: VehicleId) -> NormalizedVehicle {
    let id = raw.get("id").and_then(VehicleId::from_value).unwrap_or(fallback_id);

    let brand_value = resolve(raw, BRAND_FIELDS, read_text);
    let model_value = resolve(raw, MODEL_FIELDS, read_text);
    let title = resolve(raw, TITLE_FIELDS, read_text).unwrap_or_else(|| {
        let synthesized = format!(
            "{} {}",
            brand_value.as_deref().unwrap_or("Unknown"),
            model_value.as_deref().unwrap_or("")
        );
        synthesized.trim().to_string()
    });

    let year = resolve(raw, YEAR_FIELDS, read_number)
        .map(|n| n.trunc())
        .filter(|n| *n != 0.0 && *n >= i32::MIN as f64 && *n <= i32::MAX as f64)
        .map(|n| n as i32)
        .unwrap_or_else(current_year);

    let price = resolve(raw, PRICE_FIELDS, read_number)
        .map(|n| n.max(0.0))
        .unwrap_or(0.0);

    let main_image =
        resolve(raw, IMAGE_FIELDS, read_text).unwrap_or_else(|| placeholder_image(&id, ""));
    let gallery = [
        main_image.clone(),
        placeholder_image(&id, GALLERY_SUFFIXES[0]),
        placeholder_image(&id, GALLERY_SUFFIXES[1]),
        placeholder_image(&id, GALLERY_SUFFIXES[2]),
    ];

    let fuel_type = resolve(raw, FUEL_FIELDS, read_parsed::<FuelType>)
        .unwrap_or_else(|| infer_fuel_type(&title));
    let transmission = resolve(raw, TRANSMISSION_FIELDS, read_parsed::<Transmission>)
        .unwrap_or(Transmission::Automatic);

    let mileage = resolve(raw, MILEAGE_FIELDS, read_number)
        .filter(|n| *n >= 1.0)
        .map(|n| n.trunc() as u64)
        .unwrap_or_else(|| seeded_mileage(&id));

    NormalizedVehicle {
        title,
        brand: brand_value.unwrap_or_else(|| DEFAULT_BRAND.to_string()),
        model: model_value.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        year,
        price,
        main_image,
        gallery,
        location: resolve(raw, LOCATION_FIELDS, read_text)
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        description: resolve(raw, DESCRIPTION_FIELDS, read_text)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        fuel_type,
        transmission,
        mileage,
        id,
    }
}

// First candidate key whose value the reader accepts.
fn resolve<T>(
    raw: &RawVehicleRecord,
    candidates: &[&str],
    read: fn(&Value) -> Option<T>,
) -> Option<T> {
    candidates.iter().find_map(|key| raw.get(key).and_then(read))
}

fn read_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn read_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn read_parsed<T: std::str::FromStr>(value: &Value) -> Option<T> {
    value.as_str().and_then(|s| s.parse().ok())
}

// Parses the numeric prefix of a string ("2019 model" -> 2019, "abc" -> None).
fn leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    trimmed[..end].trim_end_matches('.').parse().ok()
}

/// Case-sensitive keyword inference used when the record has no usable fuel type.
pub fn infer_fuel_type(title: &str) -> FuelType {
    if title.contains("Electric") {
        FuelType::Electric
    } else if title.contains("Hybrid") {
        FuelType::Hybrid
    } else {
        FuelType::Petrol
    }
}

fn placeholder_image(id: &VehicleId, suffix: &str) -> String {
    format!("{}/{}{}/800/600", PLACEHOLDER_IMAGE_BASE, id, suffix)
}

/// Deterministic stand-in mileage in `[1000, 51000)`, seeded by the id (FNV-1a).
pub fn seeded_mileage(id: &VehicleId) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in id.to_string().bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    MILEAGE_DEFAULT_MIN + hash % MILEAGE_DEFAULT_SPAN
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}
