//! Router assembly: ambient routes at the root, resources under the API prefix.

mod common;
mod resource;

pub use common::{common_routes, common_routes_with_ready};
pub use resource::{api_routes, resource_routes};

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application router with body-size limiting and request tracing.
pub fn app(state: AppState) -> Router {
    let api = api_routes(state.storage.clone(), &state.catalog);
    let prefix = state.settings.api_prefix.clone();
    let body_limit = state.settings.body_limit_bytes;
    let router = common_routes_with_ready(state);
    let router = if prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(&prefix, api)
    };
    router.fallback(common::route_not_found).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(body_limit)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Catalog, Settings};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    #[tokio::test]
    async fn unknown_paths_get_the_error_envelope() {
        let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/summit").unwrap();
        let router = app(AppState::new(pool, Catalog::load().unwrap(), Settings::default()));
        for uri in ["/api/v1/volcanoes", "/api/v1/peaks/1/photos", "/nowhere"] {
            let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let resp = router.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(
                body,
                json!({ "success": false, "message": format!("route {} not found", uri), "error": "not_found" })
            );
        }
    }
}
