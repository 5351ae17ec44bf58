//! Handlers for the fixed, resource-specific listings.

use crate::error::AppError;
use crate::query::QueryDescriptor;
use crate::resources::{gallery, navigation, peaks, trekking};
use crate::response::{success_many, success_one, Envelope};
use crate::service::ResourceRepository;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::json;
use std::collections::HashMap;

/// Lenient `limit` parameter: anything unparsable is treated as absent.
fn limit_param(params: &HashMap<String, String>) -> Option<i64> {
    params.get("limit").and_then(|v| v.trim().parse().ok())
}

pub async fn top_peaks(
    State(repo): State<ResourceRepository>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope>, AppError> {
    let rows = peaks::top_peaks(&repo, limit_param(&params)).await?;
    Ok(success_many(rows))
}

/// Matching peak count; honors the same filters and search as the listing.
pub async fn peak_count(
    State(repo): State<ResourceRepository>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope>, AppError> {
    let total = repo.count(&QueryDescriptor::parse(&params, repo.descriptor())).await?;
    Ok(success_one(json!({ "count": total })))
}

pub async fn highest_peak(State(repo): State<ResourceRepository>) -> Result<Json<Envelope>, AppError> {
    let peak = peaks::highest_peak(&repo)
        .await?
        .ok_or_else(|| AppError::NotFound(repo.descriptor().name.to_string()))?;
    Ok(success_one(peak))
}

pub async fn peaks_by_elevation(
    State(repo): State<ResourceRepository>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope>, AppError> {
    let range = peaks::ElevationRange::parse(
        params.get("min").map(String::as_str),
        params.get("max").map(String::as_str),
    )?;
    let rows = peaks::find_by_elevation(&repo, range).await?;
    Ok(success_many(rows))
}

pub async fn routes_by_difficulty(
    State(repo): State<ResourceRepository>,
    Path(level): Path<String>,
) -> Result<Json<Envelope>, AppError> {
    let rows = trekking::find_by_difficulty(&repo, &level).await?;
    Ok(success_many(rows))
}

pub async fn featured_images(
    State(repo): State<ResourceRepository>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope>, AppError> {
    let rows = gallery::featured(&repo, limit_param(&params)).await?;
    Ok(success_many(rows))
}

pub async fn active_menu(State(repo): State<ResourceRepository>) -> Result<Json<Envelope>, AppError> {
    let rows = navigation::active_menu(&repo).await?;
    Ok(success_many(rows))
}
