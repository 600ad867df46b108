// Catalog view state engine: filtering, sorting, facets, recommendations and
// comparison rows, plus the favorite/compare transitions applied by a session

use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::BTreeSet,
    sync::Arc,
};

use crate::{
    models::{FuelType, NormalizedVehicle, VehicleId},
    store::{FavoriteSet, FavoritesStore},
};

pub const COMPARE_LIMIT: usize = 3;
pub const COMPARE_READY_MIN: usize = 2;
pub const DEFAULT_MAX_PRICE: f64 = 200_000.0;
pub const SIMILAR_PRICE_WINDOW: f64 = 10_000.0;
pub const SIMILAR_DEFAULT_LIMIT: usize = 3;

pub const FAVORITE_ADDED: &str = "Added to favorites";
pub const FAVORITE_REMOVED: &str = "Removed from favorites";
pub const COMPARE_LIMIT_NOTICE: &str = "You can only compare up to 3 vehicles.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    // Keeps the catalog order
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    YearNewest,
    YearOldest,
    MileageLow,
    MileageHigh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search: String,
    // Empty means "any brand"
    pub brands: BTreeSet<String>,
    // Empty means "any fuel type"
    pub fuel_types: BTreeSet<FuelType>,
    pub max_price: f64,
    pub sort: SortOption,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            search: String::new(),
            brands: BTreeSet::new(),
            fuel_types: BTreeSet::new(),
            max_price: DEFAULT_MAX_PRICE,
            sort: SortOption::None,
        }
    }
}

impl FilterCriteria {
    fn matches(&self, vehicle: &NormalizedVehicle, needle: &str) -> bool {
        let matches_search = vehicle.title.to_lowercase().contains(needle)
            || vehicle.model.to_lowercase().contains(needle);
        let matches_brand = self.brands.is_empty() || self.brands.contains(&vehicle.brand);
        let matches_fuel =
            self.fuel_types.is_empty() || self.fuel_types.contains(&vehicle.fuel_type);
        let matches_price = vehicle.price >= 0.0 && vehicle.price <= self.max_price;
        matches_search && matches_brand && matches_fuel && matches_price
    }
}

/// Filters `vehicles` by every predicate in `criteria`, then orders the
/// survivors by the active sort key. The sort is stable, so ties and
/// `SortOption::None` keep the input order.
pub fn apply_filters(
    vehicles: &[NormalizedVehicle],
    criteria: &FilterCriteria,
) -> Vec<NormalizedVehicle> {
    let needle = criteria.search.to_lowercase();
    let mut matched: Vec<NormalizedVehicle> = vehicles
        .iter()
        .filter(|v| criteria.matches(v, &needle))
        .cloned()
        .collect();
    matched.sort_by(|a, b| compare_by(criteria.sort, a, b));
    matched
}

fn compare_by(sort: SortOption, a: &NormalizedVehicle, b: &NormalizedVehicle) -> Ordering {
    match sort {
        SortOption::None => Ordering::Equal,
        SortOption::PriceAsc => a.price.total_cmp(&b.price),
        SortOption::PriceDesc => b.price.total_cmp(&a.price),
        SortOption::YearNewest => b.year.cmp(&a.year),
        SortOption::YearOldest => a.year.cmp(&b.year),
        SortOption::MileageLow => a.mileage.cmp(&b.mileage),
        SortOption::MileageHigh => b.mileage.cmp(&a.mileage),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteToggle {
    pub favorites: FavoriteSet,
    pub is_favorite: bool,
    pub notice: &'static str,
}

pub fn toggle_favorite(id: &VehicleId, favorites: &FavoriteSet) -> FavoriteToggle {
    let mut updated = favorites.clone();
    if updated.remove(id) {
        FavoriteToggle { favorites: updated, is_favorite: false, notice: FAVORITE_REMOVED }
    } else {
        updated.insert(id.clone());
        FavoriteToggle { favorites: updated, is_favorite: true, notice: FAVORITE_ADDED }
    }
}

/// Vehicles picked for side-by-side comparison, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonSet {
    vehicles: Vec<NormalizedVehicle>,
}

impl ComparisonSet {
    pub fn vehicles(&self) -> &[NormalizedVehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn contains(&self, id: &VehicleId) -> bool {
        self.vehicles.iter().any(|v| &v.id == id)
    }

    // The compare action stays disabled below two vehicles
    pub fn is_ready(&self) -> bool {
        self.vehicles.len() >= COMPARE_READY_MIN
    }

    fn without(&self, id: &VehicleId) -> ComparisonSet {
        ComparisonSet {
            vehicles: self.vehicles.iter().filter(|v| &v.id != id).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOutcome {
    Added,
    Removed,
    Rejected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareToggle {
    pub set: ComparisonSet,
    pub outcome: CompareOutcome,
    pub notice: Option<&'static str>,
}

pub fn toggle_compare(vehicle: &NormalizedVehicle, set: &ComparisonSet) -> CompareToggle {
    if set.contains(&vehicle.id) {
        return CompareToggle {
            set: set.without(&vehicle.id),
            outcome: CompareOutcome::Removed,
            notice: None,
        };
    }
    if set.len() >= COMPARE_LIMIT {
        return CompareToggle {
            set: set.clone(),
            outcome: CompareOutcome::Rejected,
            notice: Some(COMPARE_LIMIT_NOTICE),
        };
    }
    let mut updated = set.clone();
    updated.vehicles.push(vehicle.clone());
    CompareToggle { set: updated, outcome: CompareOutcome::Added, notice: None }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub brands: Vec<String>,
    pub fuel_types: Vec<FuelType>,
}

/// Distinct brands and fuel types of the whole catalog, alphabetically.
pub fn derive_sidebar_facets(vehicles: &[NormalizedVehicle]) -> Facets {
    let brands: BTreeSet<String> = vehicles.iter().map(|v| v.brand.clone()).collect();
    let mut fuel_types: Vec<FuelType> = vehicles
        .iter()
        .map(|v| v.fuel_type)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    fuel_types.sort_by_key(|f| f.as_str());
    Facets { brands: brands.into_iter().collect(), fuel_types }
}

/// Vehicles sharing the subject's brand or priced within 10 000 of it,
/// in catalog order, excluding the subject itself.
pub fn recommend_similar(
    all: &[NormalizedVehicle],
    subject: &NormalizedVehicle,
    limit: usize,
) -> Vec<NormalizedVehicle> {
    all.iter()
        .filter(|v| v.id != subject.id)
        .filter(|v| {
            v.brand == subject.brand || (v.price - subject.price).abs() < SIMILAR_PRICE_WINDOW
        })
        .take(limit)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub values: Vec<String>,
}

// One row per attribute, one value per compared vehicle
pub fn comparison_rows(set: &ComparisonSet) -> Vec<ComparisonRow> {
    let row = |label: &'static str, value: fn(&NormalizedVehicle) -> String| ComparisonRow {
        label,
        values: set.vehicles().iter().map(value).collect(),
    };
    vec![
        row("Year", |v| v.year.to_string()),
        row("Make", |v| v.brand.clone()),
        row("Model", |v| v.model.clone()),
        row("Mileage", |v| format!("{} mi", group_thousands(v.mileage))),
        row("Fuel Type", |v| v.fuel_type.to_string()),
        row("Transmission", |v| v.transmission.to_string()),
        row("Location", |v| v.location.clone()),
    ]
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// State of one catalog view: the working vehicle set, the filter criteria
/// and the favorite/comparison selections.
pub struct CatalogSession {
    vehicles: Vec<NormalizedVehicle>,
    facets: Facets,
    criteria: FilterCriteria,
    favorites: FavoriteSet,
    comparison: ComparisonSet,
    store: Arc<dyn FavoritesStore>,
}

impl CatalogSession {
    /// Starts an empty session, reading saved favorites once.
    pub fn mount(store: Arc<dyn FavoritesStore>) -> Self {
        let favorites = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load saved favorites, starting with none");
            FavoriteSet::new()
        });
        tracing::debug!(count = favorites.len(), "Catalog session mounted");
        CatalogSession {
            vehicles: Vec::new(),
            facets: Facets::default(),
            criteria: FilterCriteria::default(),
            favorites,
            comparison: ComparisonSet::default(),
            store,
        }
    }

    /// Swaps in a freshly fetched vehicle set. Compared vehicles are re-read
    /// from the new set; those no longer present are dropped.
    pub fn replace_vehicles(&mut self, vehicles: Vec<NormalizedVehicle>) {
        self.facets = derive_sidebar_facets(&vehicles);
        self.comparison = ComparisonSet {
            vehicles: self
                .comparison
                .vehicles
                .iter()
                .filter_map(|old| vehicles.iter().find(|v| v.id == old.id).cloned())
                .collect(),
        };
        self.vehicles = vehicles;
        tracing::debug!(count = self.vehicles.len(), "Catalog working set replaced");
    }

    pub fn vehicles(&self) -> &[NormalizedVehicle] {
        &self.vehicles
    }

    pub fn find(&self, id: &VehicleId) -> Option<&NormalizedVehicle> {
        self.vehicles.iter().find(|v| &v.id == id)
    }

    pub fn visible(&self) -> Vec<NormalizedVehicle> {
        apply_filters(&self.vehicles, &self.criteria)
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        tracing::debug!(?criteria, "Filter criteria replaced");
        self.criteria = criteria;
    }

    pub fn toggle_brand(&mut self, brand: &str) {
        if !self.criteria.brands.remove(brand) {
            self.criteria.brands.insert(brand.to_string());
        }
    }

    pub fn toggle_fuel(&mut self, fuel: FuelType) {
        if !self.criteria.fuel_types.remove(&fuel) {
            self.criteria.fuel_types.insert(fuel);
        }
    }

    // Sidebar reset: brand, fuel and price go back to defaults, the search stays
    pub fn reset_filters(&mut self) {
        self.criteria.brands.clear();
        self.criteria.fuel_types.clear();
        self.criteria.max_price = DEFAULT_MAX_PRICE;
    }

    pub fn clear_filters(&mut self) {
        self.reset_filters();
        self.criteria.search.clear();
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &VehicleId) -> bool {
        self.favorites.contains(id)
    }

    /// Flips `id` in the favorites and writes the set back to the store.
    /// A failed write is logged; the in-memory set still changes.
    pub fn toggle_favorite(&mut self, id: &VehicleId) -> FavoriteToggle {
        let toggle = toggle_favorite(id, &self.favorites);
        self.favorites = toggle.favorites.clone();
        if let Err(e) = self.store.save(&self.favorites) {
            tracing::warn!(error = %e, "Failed to persist favorites");
        }
        tracing::debug!(id = %id, is_favorite = toggle.is_favorite, "Favorite toggled");
        toggle
    }

    pub fn comparison(&self) -> &ComparisonSet {
        &self.comparison
    }

    /// Toggles the vehicle with `id` in the comparison set. Returns `None`
    /// when the id is not part of the working set.
    pub fn toggle_compare(&mut self, id: &VehicleId) -> Option<CompareToggle> {
        let vehicle = self.find(id)?;
        let toggle = toggle_compare(vehicle, &self.comparison);
        self.comparison = toggle.set.clone();
        tracing::debug!(
            id = %id,
            outcome = ?toggle.outcome,
            size = self.comparison.len(),
            "Comparison toggled"
        );
        Some(toggle)
    }

    pub fn remove_from_compare(&mut self, id: &VehicleId) -> bool {
        let before = self.comparison.len();
        self.comparison = self.comparison.without(id);
        self.comparison.len() != before
    }

    pub fn clear_compare(&mut self) {
        self.comparison = ComparisonSet::default();
    }
}
