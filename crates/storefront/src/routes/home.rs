//! Home page route handler.

use axum::{Json, extract::State};
use clear_hearing_core::{Advantage, Hero, Partner, Product, ProductFilter, Section, Service};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// An entry of the featured strip: products first, then services.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeaturedItem {
    Product(Product),
    Service(Service),
}

/// Navigation entry.
#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub section: Section,
    pub path: &'static str,
}

/// Home page data.
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub hero: Hero,
    pub advantages: Vec<Advantage>,
    pub partners: Vec<Partner>,
    pub featured: Vec<FeaturedItem>,
    pub navigation: Vec<NavLink>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Json<HomeView> {
    let store = state.store();

    let featured = store
        .catalog()
        .list_products(&ProductFilter::All)
        .into_iter()
        .map(FeaturedItem::Product)
        .chain(
            store
                .services()
                .list()
                .iter()
                .cloned()
                .map(FeaturedItem::Service),
        )
        .collect();

    Json(HomeView {
        hero: store.hero().get(),
        advantages: store.advantages().list().to_vec(),
        partners: store.partners().list().to_vec(),
        featured,
        navigation: Section::ALL
            .iter()
            .map(|&section| NavLink {
                section,
                path: section.path(),
            })
            .collect(),
    })
}
