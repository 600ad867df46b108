// Route definitions

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

// Import the AppState struct defined in main.rs
use crate::AppState;

mod api;

pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        // Catalog
        .route("/cars", get(api::list_cars))
        .route("/cars/reload", post(api::reload_cars))
        .route("/cars/:id", get(api::get_car))
        .route("/facets", get(api::get_facets))
        // Filter criteria
        .route("/criteria", get(api::get_criteria).put(api::put_criteria))
        .route("/criteria/brands/:brand", post(api::toggle_brand))
        .route("/criteria/fuel/:fuel", post(api::toggle_fuel))
        .route("/criteria/reset", post(api::reset_criteria))
        .route("/criteria/clear", post(api::clear_criteria))
        // Favorites
        .route("/favorites", get(api::get_favorites))
        .route("/favorites/:id", post(api::toggle_favorite))
        // Comparison
        .route("/compare", get(api::get_comparison).delete(api::clear_compare))
        .route("/compare/:id", post(api::toggle_compare).delete(api::remove_from_compare))
        .with_state(app_state);

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{COMPARE_LIMIT_NOTICE, CatalogSession, FAVORITE_ADDED},
        config::Settings,
        gateway::{
            CatalogGateway,
            tests::{serve, unreachable_base_url},
        },
        store::MemoryStore,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    // App wired to an unreachable catalog, so every fetch serves the samples
    async fn spawn_app() -> String {
        let mut settings = Settings::for_tests(&unreachable_base_url().await);
        settings.list_fallback_delay_ms = 0;
        settings.detail_fallback_delay_ms = 0;
        let app_state = AppState {
            gateway: Arc::new(CatalogGateway::new(Arc::new(reqwest::Client::new()), &settings)),
            session: Arc::new(RwLock::new(CatalogSession::mount(Arc::new(MemoryStore::with(&[]))))),
        };
        let base = serve(create_router(app_state)).await;
        let client = reqwest::Client::new();
        client.post(format!("{}/api/cars/reload", base)).send().await.unwrap();
        base
    }

    async fn call(method: reqwest::Method, url: String) -> (reqwest::StatusCode, Value) {
        let response = reqwest::Client::new().request(method, url).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_list_reports_favorite_flags() {
        let base = spawn_app().await;

        let (_, listing) = call(reqwest::Method::GET, format!("{}/api/cars", base)).await;
        assert_eq!(listing["count"], json!(8));
        assert_eq!(listing["vehicles"][2]["isFavorite"], json!(false));

        let (status, toggled) = call(reqwest::Method::POST, format!("{}/api/favorites/3", base)).await;
        assert!(status.is_success());
        assert_eq!(toggled["message"], json!(FAVORITE_ADDED));
        assert_eq!(toggled["favorites"], json!([3]));

        let (_, listing) = call(reqwest::Method::GET, format!("{}/api/cars", base)).await;
        assert_eq!(listing["vehicles"][2]["id"], json!(3));
        assert_eq!(listing["vehicles"][2]["isFavorite"], json!(true));
    }

    #[tokio::test]
    async fn test_compare_rejects_fourth_vehicle() {
        let base = spawn_app().await;

        for id in 1..=3 {
            call(reqwest::Method::POST, format!("{}/api/compare/{}", base, id)).await;
        }
        let (status, rejected) = call(reqwest::Method::POST, format!("{}/api/compare/4", base)).await;
        assert!(status.is_success());
        assert_eq!(rejected["outcome"], json!("rejected"));
        assert_eq!(rejected["message"], json!(COMPARE_LIMIT_NOTICE));

        let (_, comparison) = call(reqwest::Method::GET, format!("{}/api/compare", base)).await;
        assert_eq!(comparison["ready"], json!(true));
        assert_eq!(comparison["count"], json!(3));
        assert_eq!(comparison["rows"].as_array().map(Vec::len), Some(7));

        let (status, _) = call(reqwest::Method::POST, format!("{}/api/compare/404", base)).await;
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);

        let (_, cleared) = call(reqwest::Method::DELETE, format!("{}/api/compare", base)).await;
        assert_eq!(cleared["ready"], json!(false));
    }

    #[tokio::test]
    async fn test_detail_includes_similar_vehicles() {
        let base = spawn_app().await;

        let (status, detail) = call(reqwest::Method::GET, format!("{}/api/cars/2", base)).await;
        assert!(status.is_success());
        assert_eq!(detail["vehicle"]["title"], json!("Tesla Model 3 Long Range"));
        // Only the BMW at 45 000 is within 10 000 of the Tesla at 48 000
        assert_eq!(detail["similar"].as_array().map(Vec::len), Some(1));
        assert_eq!(detail["similar"][0]["id"], json!(5));

        let (status, missing) = call(reqwest::Method::GET, format!("{}/api/cars/999", base)).await;
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
        assert_eq!(missing["success"], json!(false));
    }

    #[tokio::test]
    async fn test_criteria_drive_the_listing() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let listing: Value = client
            .put(format!("{}/api/criteria", base))
            .json(&json!({ "sort": "price_desc", "maxPrice": 50000 }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(listing["count"], json!(6));
        assert_eq!(listing["vehicles"][0]["id"], json!(2));

        let (_, listing) = call(reqwest::Method::POST, format!("{}/api/criteria/fuel/hybrid", base)).await;
        assert_eq!(listing["count"], json!(1));

        let (status, _) = call(reqwest::Method::POST, format!("{}/api/criteria/fuel/steam", base)).await;
        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);

        let (_, listing) = call(reqwest::Method::POST, format!("{}/api/criteria/clear", base)).await;
        assert_eq!(listing["count"], json!(8));

        let (_, facets) = call(reqwest::Method::GET, format!("{}/api/facets", base)).await;
        assert_eq!(facets["fuelTypes"], json!(["Electric", "Hybrid", "Petrol"]));
    }
}
