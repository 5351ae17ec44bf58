//! Navigation menu entries, linking either to a page slug or an external URL.

use crate::config::{Column, ColumnKind, DefaultValue, FieldRule, JoinSpec, ResourceDescriptor};
use crate::error::AppError;
use crate::query::SortDirection;
use crate::service::ResourceRepository;
use crate::sql::{FixedQuery, Predicate};
use serde_json::Value;

pub static NAVIGATION_MENU: ResourceDescriptor = ResourceDescriptor {
    name: "menu item",
    path_segment: "navigation",
    table: "navigation_menu",
    primary_key: "menu_id",
    columns: &[
        Column::new("menu_id", ColumnKind::Int),
        Column::new("menu_text", ColumnKind::Text),
        Column::new("page_slug", ColumnKind::Text),
        Column::new("external_url", ColumnKind::Text),
        Column::new("display_order", ColumnKind::Int),
        Column::new("is_active", ColumnKind::Bool),
    ],
    filterable: &["is_active", "page_slug", "display_order"],
    searchable: &["menu_text"],
    insertable: &["menu_text", "page_slug", "external_url", "display_order", "is_active"],
    updatable: &["menu_text", "page_slug", "external_url", "display_order", "is_active"],
    slug_column: None,
    joins: &[JoinSpec {
        table: "pages",
        alias: "pg",
        local_column: "page_slug",
        foreign_column: "slug",
        fields: &[("title", "page_title")],
    }],
    default_sort: "display_order",
    default_order: SortDirection::Asc,
    default_page_size: 10,
    max_page_size: 100,
    defaults: &[
        ("page_slug", DefaultValue::Null),
        ("external_url", DefaultValue::Null),
        ("display_order", DefaultValue::Int(0)),
        ("is_active", DefaultValue::Bool(true)),
    ],
    rules: &[
        FieldRule::new("menu_text").required().non_blank().max_length(100),
        FieldRule::new("external_url").max_length(2048),
        FieldRule::new("display_order").minimum(0.0),
    ],
};

/// Active menu entries in display order, with the linked page's title.
pub async fn active_menu(repo: &ResourceRepository) -> Result<Vec<Value>, AppError> {
    repo.find_fixed(&FixedQuery {
        predicate: Predicate::Equals("is_active", Value::Bool(true)),
        order_by: "display_order",
        order: SortDirection::Asc,
        limit: None,
    })
    .await
}
