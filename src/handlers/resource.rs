//! Generic CRUD handlers. Each resource router carries its own repository as state.

use crate::error::AppError;
use crate::query::QueryDescriptor;
use crate::response::{created, message_only, success_one, success_page, updated, Envelope};
use crate::service::{parse_id, ResourceRepository};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Request bodies must be JSON objects; anything else is a 400 in the usual envelope.
fn body_to_map(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match body {
        Ok(Json(Value::Object(m))) => Ok(m),
        Ok(_) => Err(AppError::BadRequest("body must be a JSON object".into())),
        Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
    }
}

fn not_found(repo: &ResourceRepository) -> AppError {
    AppError::NotFound(repo.descriptor().name.to_string())
}

pub async fn list(
    State(repo): State<ResourceRepository>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope>, AppError> {
    let query = QueryDescriptor::parse(&params, repo.descriptor());
    let page = repo.find_all(&query).await?;
    Ok(success_page(page))
}

pub async fn read(State(repo): State<ResourceRepository>, Path(id): Path<String>) -> Result<Json<Envelope>, AppError> {
    let id = parse_id(&id)?;
    let row = repo.find_by_id(id).await?.ok_or_else(|| not_found(&repo))?;
    Ok(success_one(row))
}

pub async fn read_by_slug(
    State(repo): State<ResourceRepository>,
    Path(slug): Path<String>,
) -> Result<Json<Envelope>, AppError> {
    let row = repo.find_by_slug(&slug).await?.ok_or_else(|| not_found(&repo))?;
    Ok(success_one(row))
}

pub async fn create(
    State(repo): State<ResourceRepository>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope>), AppError> {
    let body = body_to_map(body)?;
    let row = repo.create(&body).await?;
    Ok(created(row, format!("{} created successfully", repo.descriptor().name)))
}

/// Serves both PUT and PATCH: only the supplied updatable fields change.
pub async fn update(
    State(repo): State<ResourceRepository>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope>, AppError> {
    let id = parse_id(&id)?;
    let body = body_to_map(body)?;
    let row = repo.update(id, &body).await?.ok_or_else(|| not_found(&repo))?;
    Ok(updated(row, format!("{} updated successfully", repo.descriptor().name)))
}

pub async fn delete(State(repo): State<ResourceRepository>, Path(id): Path<String>) -> Result<Json<Envelope>, AppError> {
    let id = parse_id(&id)?;
    if !repo.delete(id).await? {
        return Err(not_found(&repo));
    }
    Ok(message_only(format!("{} deleted successfully", repo.descriptor().name)))
}
