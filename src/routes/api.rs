// Handlers for the catalog JSON API consumed by the front-end

use axum::{
    extract::{Json as JsonExtract, Path, State},
    response::{IntoResponse, Json},
};
use serde::Serialize;

use crate::{
    AppState,
    catalog::{
        CatalogSession, CompareOutcome, ComparisonRow, FilterCriteria, SIMILAR_DEFAULT_LIMIT,
        comparison_rows, recommend_similar,
    },
    error::{AppError, AppResult},
    models::{FuelType, NormalizedVehicle, VehicleId},
};

// --- Response Wrappers ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    #[serde(flatten)]
    vehicle: NormalizedVehicle,
    is_favorite: bool,
    is_compared: bool,
}

#[derive(Serialize)]
struct CatalogResponse {
    count: usize,
    vehicles: Vec<CatalogEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailResponse {
    vehicle: NormalizedVehicle,
    is_favorite: bool,
    similar: Vec<NormalizedVehicle>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteResponse {
    success: bool,
    message: String,
    is_favorite: bool,
    favorites: Vec<VehicleId>,
}

#[derive(Serialize)]
struct ComparisonResponse {
    ready: bool,
    count: usize,
    vehicles: Vec<NormalizedVehicle>,
    rows: Vec<ComparisonRow>,
}

#[derive(Serialize)]
struct CompareToggleResponse {
    success: bool,
    outcome: CompareOutcome,
    message: Option<String>,
    comparison: ComparisonResponse,
}

// --- Helpers ---

fn catalog_view(session: &CatalogSession) -> CatalogResponse {
    let vehicles: Vec<CatalogEntry> = session
        .visible()
        .into_iter()
        .map(|vehicle| CatalogEntry {
            is_favorite: session.is_favorite(&vehicle.id),
            is_compared: session.comparison().contains(&vehicle.id),
            vehicle,
        })
        .collect();
    CatalogResponse { count: vehicles.len(), vehicles }
}

fn comparison_view(session: &CatalogSession) -> ComparisonResponse {
    let comparison = session.comparison();
    ComparisonResponse {
        ready: comparison.is_ready(),
        count: comparison.len(),
        vehicles: comparison.vehicles().to_vec(),
        rows: comparison_rows(comparison),
    }
}

// --- Catalog ---

pub async fn list_cars(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session = app_state.session.read().await;
    let view = catalog_view(&session);
    tracing::debug!(
        "[HANDLER] /api/cars - Returning {} of {} vehicles.",
        view.count,
        session.vehicles().len()
    );
    Ok(Json(view))
}

// Re-fetches the catalog and replaces the working set wholesale
pub async fn reload_cars(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    tracing::info!("[HANDLER] /api/cars/reload - Reloading catalog.");
    let vehicles = app_state.gateway.list_vehicles().await;
    let mut session = app_state.session.write().await;
    session.replace_vehicles(vehicles);
    Ok(Json(catalog_view(&session)))
}

pub async fn get_car(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = VehicleId::parse(&id);
    tracing::info!("[HANDLER] /api/cars/:id - Request received for vehicle: {}", id);

    let (detail, all) = futures::join!(
        app_state.gateway.get_vehicle(&id),
        app_state.gateway.list_vehicles()
    );
    let vehicle = detail?;
    let similar = recommend_similar(&all, &vehicle, SIMILAR_DEFAULT_LIMIT);

    let session = app_state.session.read().await;
    Ok(Json(DetailResponse {
        is_favorite: session.is_favorite(&vehicle.id),
        vehicle,
        similar,
    }))
}

pub async fn get_facets(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session = app_state.session.read().await;
    Ok(Json(session.facets().clone()))
}

// --- Filter Criteria ---

pub async fn get_criteria(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session = app_state.session.read().await;
    Ok(Json(session.criteria().clone()))
}

pub async fn put_criteria(
    State(app_state): State<AppState>,
    JsonExtract(criteria): JsonExtract<FilterCriteria>,
) -> AppResult<impl IntoResponse> {
    if !criteria.max_price.is_finite() || criteria.max_price < 0.0 {
        return Err(AppError::BadRequest(format!(
            "maxPrice must be a non-negative number, got {}",
            criteria.max_price
        )));
    }
    let mut session = app_state.session.write().await;
    session.set_criteria(criteria);
    Ok(Json(catalog_view(&session)))
}

pub async fn toggle_brand(
    State(app_state): State<AppState>,
    Path(brand): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut session = app_state.session.write().await;
    session.toggle_brand(&brand);
    Ok(Json(catalog_view(&session)))
}

pub async fn toggle_fuel(
    State(app_state): State<AppState>,
    Path(fuel): Path<String>,
) -> AppResult<impl IntoResponse> {
    let fuel: FuelType = fuel.parse().map_err(AppError::BadRequest)?;
    let mut session = app_state.session.write().await;
    session.toggle_fuel(fuel);
    Ok(Json(catalog_view(&session)))
}

pub async fn reset_criteria(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut session = app_state.session.write().await;
    session.reset_filters();
    Ok(Json(catalog_view(&session)))
}

pub async fn clear_criteria(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut session = app_state.session.write().await;
    session.clear_filters();
    Ok(Json(catalog_view(&session)))
}

// --- Favorites ---

pub async fn get_favorites(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session = app_state.session.read().await;
    Ok(Json(session.favorites().iter().cloned().collect::<Vec<_>>()))
}

pub async fn toggle_favorite(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = VehicleId::parse(&id);
    let mut session = app_state.session.write().await;
    let toggle = session.toggle_favorite(&id);
    Ok(Json(FavoriteResponse {
        success: true,
        message: toggle.notice.to_string(),
        is_favorite: toggle.is_favorite,
        favorites: toggle.favorites.into_iter().collect(),
    }))
}

// --- Comparison ---

pub async fn get_comparison(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session = app_state.session.read().await;
    Ok(Json(comparison_view(&session)))
}

pub async fn toggle_compare(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = VehicleId::parse(&id);
    let mut session = app_state.session.write().await;
    let toggle = session
        .toggle_compare(&id)
        .ok_or_else(|| AppError::NotFound(format!("vehicle {} is not in the catalog", id)))?;
    Ok(Json(CompareToggleResponse {
        // A rejection is guidance for the user, not a failure
        success: true,
        outcome: toggle.outcome,
        message: toggle.notice.map(str::to_string),
        comparison: comparison_view(&session),
    }))
}

pub async fn remove_from_compare(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = VehicleId::parse(&id);
    let mut session = app_state.session.write().await;
    if !session.remove_from_compare(&id) {
        tracing::debug!("[HANDLER] /api/compare/:id - Vehicle {} was not being compared.", id);
    }
    Ok(Json(comparison_view(&session)))
}

pub async fn clear_compare(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut session = app_state.session.write().await;
    session.clear_compare();
    Ok(Json(comparison_view(&session)))
}
