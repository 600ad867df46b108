// Catalog data structures: raw upstream records and the canonical vehicle

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

/// Vehicle identifier as sent by the catalog: either an integer or a string.
///
/// Numeric strings are folded into `Number` on construction, so `"7"` and `7`
/// compare equal. This is the only id equality the crate uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum VehicleId {
    Number(i64),
    Text(String),
}

impl VehicleId {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => VehicleId::Number(n),
            Err(_) => VehicleId::Text(trimmed.to_string()),
        }
    }

    /// Reads an id from a JSON value. Empty strings, nulls and non-scalars yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(
                n.as_i64()
                    .map(VehicleId::Number)
                    .unwrap_or_else(|| VehicleId::parse(&n.to_string())),
            ),
            Value::String(s) if !s.trim().is_empty() => Some(VehicleId::parse(s)),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleId::Number(n) => write!(f, "{}", n),
            VehicleId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl<'de> Deserialize<'de> for VehicleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        VehicleId::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid vehicle id: {}", value)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "petrol" => Ok(FuelType::Petrol),
            "diesel" => Ok(FuelType::Diesel),
            "electric" => Ok(FuelType::Electric),
            "hybrid" => Ok(FuelType::Hybrid),
            other => Err(format!("unknown fuel type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transmission {
    Automatic,
    Manual,
}

impl Transmission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Automatic => "Automatic",
            Transmission::Manual => "Manual",
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transmission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "automatic" => Ok(Transmission::Automatic),
            "manual" => Ok(Transmission::Manual),
            other => Err(format!("unknown transmission '{}'", other)),
        }
    }
}

// Untyped record as received from the catalog (or from the local samples).
// Anything that is not a JSON object is kept as an empty record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawVehicleRecord {
    fields: Map<String, Value>,
}

impl RawVehicleRecord {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => RawVehicleRecord { fields },
            _ => RawVehicleRecord::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl<'de> Deserialize<'de> for RawVehicleRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(RawVehicleRecord::from_value)
    }
}

// Canonical vehicle handed to the view engine. Built only by `normalize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedVehicle {
    pub id: VehicleId,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    #[serde(rename = "image")] // Same key the catalog uses for the main picture
    pub main_image: String,
    #[serde(rename = "images")]
    pub gallery: [String; 4],
    pub location: String,
    pub description: String,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub mileage: u64,
}
