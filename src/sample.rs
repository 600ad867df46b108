// Local sample catalog served when the remote catalog is unreachable

use once_cell::sync::Lazy;
use serde_json::json;

use crate::models::{RawVehicleRecord, VehicleId};

pub static SAMPLE_VEHICLES: Lazy<Vec<RawVehicleRecord>> = Lazy::new(|| {
    let records = vec![
        json!({
            "id": 1,
            "title": "Honda Civic Sport",
            "brand": "Honda",
            "model": "Civic",
            "year": 2022,
            "price": 24500,
            "image": "https://images.unsplash.com/photo-1605152276897-4f618f831968?auto=format&fit=crop&w=800&q=80",
            "location": "New York, NY",
            "description": "A reliable and sporty compact sedan with excellent fuel economy and modern features.",
            "fuelType": "Petrol",
            "transmission": "Automatic",
            "mileage": 12000
        }),
        json!({
            "id": 2,
            "title": "Tesla Model 3 Long Range",
            "brand": "Tesla",
            "model": "Model 3",
            "year": 2023,
            "price": 48000,
            "image": "https://images.unsplash.com/photo-1560958089-b8a1929cea89?auto=format&fit=crop&w=800&q=80",
            "location": "San Francisco, CA",
            "description": "Electric performance sedan with autopilot capabilities and minimal interior.",
            "fuelType": "Electric",
            "transmission": "Automatic",
            "mileage": 5000
        }),
        json!({
            "id": 3,
            "title": "Ford Mustang GT",
            "brand": "Ford",
            "model": "Mustang",
            "year": 2021,
            "price": 38000,
            "image": "https://images.unsplash.com/photo-1584345604476-8ec5e12e42dd?auto=format&fit=crop&w=800&q=80",
            "location": "Austin, TX",
            "description": "American muscle car with a powerful V8 engine and aggressive styling.",
            "fuelType": "Petrol",
            "transmission": "Manual",
            "mileage": 25000
        }),
        json!({
            "id": 4,
            "title": "Toyota RAV4 Hybrid",
            "brand": "Toyota",
            "model": "RAV4",
            "year": 2022,
            "price": 32000,
            "image": "https://images.unsplash.com/photo-1621007947382-bb3c3968e3bb?auto=format&fit=crop&w=800&q=80",
            "location": "Denver, CO",
            "description": "Versatile SUV with hybrid efficiency and all-wheel drive capability.",
            "fuelType": "Hybrid",
            "transmission": "Automatic",
            "mileage": 18000
        }),
        json!({
            "id": 5,
            "title": "BMW 3 Series",
            "brand": "BMW",
            "model": "330i",
            "year": 2023,
            "price": 45000,
            "image": "https://images.unsplash.com/photo-1555215695-3004980adade?auto=format&fit=crop&w=800&q=80",
            "location": "Miami, FL",
            "description": "Luxury sports sedan offering a perfect balance of comfort and driving dynamics.",
            "fuelType": "Petrol",
            "transmission": "Automatic",
            "mileage": 8000
        }),
        json!({
            "id": 6,
            "title": "Porsche 911 Carrera",
            "brand": "Porsche",
            "model": "911",
            "year": 2020,
            "price": 115000,
            "image": "https://images.unsplash.com/photo-1503376763036-066120622c74?auto=format&fit=crop&w=800&q=80",
            "location": "Los Angeles, CA",
            "description": "Iconic sports car with timeless design and unmatched performance.",
            "fuelType": "Petrol",
            "transmission": "Automatic",
            "mileage": 15000
        }),
        json!({
            "id": 7,
            "title": "Rivian R1T",
            "brand": "Rivian",
            "model": "R1T",
            "year": 2024,
            "price": 73000,
            "image": "https://images.unsplash.com/photo-1678235213608-250917036d6a?auto=format&fit=crop&w=800&q=80",
            "location": "Seattle, WA",
            "description": "The ultimate electric adventure truck with incredible off-road capabilities.",
            "fuelType": "Electric",
            "transmission": "Automatic",
            "mileage": 1200
        }),
        json!({
            "id": 8,
            "title": "Volkswagen Golf GTI",
            "brand": "Volkswagen",
            "model": "Golf",
            "year": 2019,
            "price": 28000,
            "image": "https://images.unsplash.com/photo-1541899481282-d53bffe3c35d?auto=format&fit=crop&w=800&q=80",
            "location": "Chicago, IL",
            "description": "The quintessential hot hatch, practical yet incredibly fun to drive.",
            "fuelType": "Petrol",
            "transmission": "Manual",
            "mileage": 42000
        }),
    ];

    records.into_iter().map(RawVehicleRecord::from_value).collect()
});

/// Looks up a sample record by id (`"3"` and `3` both match).
pub fn find_sample(id: &VehicleId) -> Option<&'static RawVehicleRecord> {
    SAMPLE_VEHICLES
        .iter()
        .find(|record| record.get("id").and_then(VehicleId::from_value).as_ref() == Some(id))
}
