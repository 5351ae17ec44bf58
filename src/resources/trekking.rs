//! Trekking routes: multi-day treks with a difficulty grade and region.

use crate::config::{Column, ColumnKind, FieldRule, ResourceDescriptor, SLUG_PATTERN};
use crate::error::AppError;
use crate::query::SortDirection;
use crate::service::ResourceRepository;
use crate::sql::{FixedQuery, Predicate};
use serde_json::Value;

pub static TREKKING_ROUTES: ResourceDescriptor = ResourceDescriptor {
    name: "trekking route",
    path_segment: "trekking",
    table: "trekking_routes",
    primary_key: "route_id",
    columns: &[
        Column::new("route_id", ColumnKind::Int),
        Column::new("name", ColumnKind::Text),
        Column::new("difficulty", ColumnKind::Text),
        Column::new("duration_days", ColumnKind::Int),
        Column::new("region", ColumnKind::Text),
        Column::new("description", ColumnKind::Text),
        Column::new("map_image_url", ColumnKind::Text),
        Column::new("slug", ColumnKind::Text),
    ],
    filterable: &["difficulty", "region", "duration_days", "name"],
    searchable: &["name", "description"],
    insertable: &["name", "difficulty", "duration_days", "region", "description", "map_image_url", "slug"],
    updatable: &["name", "difficulty", "duration_days", "region", "description", "map_image_url", "slug"],
    slug_column: Some("slug"),
    joins: &[],
    default_sort: "duration_days",
    default_order: SortDirection::Asc,
    default_page_size: 10,
    max_page_size: 100,
    defaults: &[],
    rules: &[
        FieldRule::new("name").required().non_blank().max_length(255),
        FieldRule::new("difficulty").required().non_blank().max_length(50),
        FieldRule::new("duration_days").minimum(1.0),
        FieldRule::new("slug").required().non_blank().max_length(255).pattern(SLUG_PATTERN),
    ],
};

/// Routes of one difficulty grade, shortest first.
pub async fn find_by_difficulty(repo: &ResourceRepository, level: &str) -> Result<Vec<Value>, AppError> {
    let level = level.trim();
    if level.is_empty() {
        return Err(AppError::Validation("difficulty level is required".into()));
    }
    repo.find_fixed(&FixedQuery {
        predicate: Predicate::Equals("difficulty", Value::String(level.to_string())),
        order_by: "duration_days",
        order: SortDirection::Asc,
        limit: None,
    })
    .await
}
