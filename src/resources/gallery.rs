//! Gallery images, optionally tied to a peak or a trekking route.

use crate::config::{Column, ColumnKind, DefaultValue, FieldRule, JoinSpec, ResourceDescriptor};
use crate::error::AppError;
use crate::query::SortDirection;
use crate::service::ResourceRepository;
use crate::sql::{FixedQuery, Predicate};
use serde_json::Value;

pub static GALLERY_IMAGES: ResourceDescriptor = ResourceDescriptor {
    name: "image",
    path_segment: "gallery",
    table: "gallery_images",
    primary_key: "image_id",
    columns: &[
        Column::new("image_id", ColumnKind::Int),
        Column::new("title", ColumnKind::Text),
        Column::new("alt_text", ColumnKind::Text),
        Column::new("image_url", ColumnKind::Text),
        Column::new("category", ColumnKind::Text),
        Column::new("related_peak_id", ColumnKind::Int),
        Column::new("related_route_id", ColumnKind::Int),
        Column::new("is_featured", ColumnKind::Bool),
        Column::new("upload_date", ColumnKind::Timestamp),
    ],
    filterable: &["category", "is_featured", "related_peak_id", "related_route_id", "title", "upload_date"],
    searchable: &["title", "alt_text"],
    insertable: &[
        "title",
        "alt_text",
        "image_url",
        "category",
        "related_peak_id",
        "related_route_id",
        "is_featured",
    ],
    updatable: &[
        "title",
        "alt_text",
        "image_url",
        "category",
        "related_peak_id",
        "related_route_id",
        "is_featured",
    ],
    slug_column: None,
    joins: &[
        JoinSpec {
            table: "peaks",
            alias: "p",
            local_column: "related_peak_id",
            foreign_column: "peak_id",
            fields: &[("name", "peak_name")],
        },
        JoinSpec {
            table: "trekking_routes",
            alias: "tr",
            local_column: "related_route_id",
            foreign_column: "route_id",
            fields: &[("name", "route_name")],
        },
    ],
    default_sort: "upload_date",
    default_order: SortDirection::Desc,
    default_page_size: 10,
    max_page_size: 100,
    defaults: &[
        ("title", DefaultValue::Text("")),
        ("alt_text", DefaultValue::Text("")),
        ("image_url", DefaultValue::Text("")),
        ("category", DefaultValue::Text("mountain")),
        ("related_peak_id", DefaultValue::Null),
        ("related_route_id", DefaultValue::Null),
        ("is_featured", DefaultValue::Bool(false)),
    ],
    rules: &[
        FieldRule::new("title").required().non_blank().max_length(255),
        FieldRule::new("image_url").required().non_blank().max_length(2048),
        FieldRule::new("category").non_blank().max_length(50),
        FieldRule::new("related_peak_id").minimum(1.0),
        FieldRule::new("related_route_id").minimum(1.0),
    ],
};

const FEATURED_DEFAULT: u32 = 10;

/// Featured images, newest first. Limit defaults to 10 and is clamped to the page-size bound.
pub async fn featured(repo: &ResourceRepository, limit: Option<i64>) -> Result<Vec<Value>, AppError> {
    let max = repo.descriptor().max_page_size;
    let limit = limit
        .filter(|n| *n >= 1)
        .map(|n| n.min(i64::from(max)) as u32)
        .unwrap_or(FEATURED_DEFAULT);
    repo.find_fixed(&FixedQuery {
        predicate: Predicate::Equals("is_featured", Value::Bool(true)),
        order_by: "upload_date",
        order: SortDirection::Desc,
        limit: Some(limit),
    })
    .await
}
