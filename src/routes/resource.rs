//! One router per resource kind, mounted at its path segment.

use crate::config::{Catalog, ResourceDescriptor};
use crate::handlers::{fixed, resource};
use crate::resources::{GALLERY_IMAGES, NAVIGATION_MENU, PEAKS, TREKKING_ROUTES};
use crate::service::ResourceRepository;
use crate::store::Storage;
use axum::{routing::get, Router};
use std::sync::Arc;

/// CRUD routes every kind gets, plus slug lookup where the kind has a slug column.
fn crud_routes(descriptor: &'static ResourceDescriptor) -> Router<ResourceRepository> {
    let router = Router::new()
        .route("/", get(resource::list).post(resource::create))
        .route(
            "/:id",
            get(resource::read)
                .put(resource::update)
                .patch(resource::update)
                .delete(resource::delete),
        );
    if descriptor.slug_column.is_some() {
        router.route("/slug/:slug", get(resource::read_by_slug))
    } else {
        router
    }
}

/// Fixed listings for the kinds that have them. Static segments win over `/:id`.
fn fixed_routes(descriptor: &'static ResourceDescriptor) -> Router<ResourceRepository> {
    let router = Router::new();
    match descriptor.path_segment {
        p if p == PEAKS.path_segment => router
            .route("/top", get(fixed::top_peaks))
            .route("/count", get(fixed::peak_count))
            .route("/highest", get(fixed::highest_peak))
            .route("/elevation", get(fixed::peaks_by_elevation)),
        p if p == TREKKING_ROUTES.path_segment => router.route("/difficulty/:level", get(fixed::routes_by_difficulty)),
        p if p == GALLERY_IMAGES.path_segment => router.route("/featured", get(fixed::featured_images)),
        p if p == NAVIGATION_MENU.path_segment => router.route("/active", get(fixed::active_menu)),
        _ => router,
    }
}

pub fn resource_routes(storage: Arc<dyn Storage>, descriptor: &'static ResourceDescriptor) -> Router {
    crud_routes(descriptor)
        .merge(fixed_routes(descriptor))
        .with_state(ResourceRepository::new(storage, descriptor))
}

/// Every catalog resource nested under `/<path_segment>`.
pub fn api_routes(storage: Arc<dyn Storage>, catalog: &Catalog) -> Router {
    catalog.resources.iter().fold(Router::new(), |app, d| {
        app.nest(&format!("/{}", d.path_segment), resource_routes(storage.clone(), *d))
    })
}
