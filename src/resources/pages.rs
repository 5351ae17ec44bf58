//! Static content pages addressed by slug.

use crate::config::{Column, ColumnKind, DefaultValue, FieldRule, ResourceDescriptor, SLUG_PATTERN};
use crate::query::SortDirection;

pub static PAGES: ResourceDescriptor = ResourceDescriptor {
    name: "page",
    path_segment: "pages",
    table: "pages",
    primary_key: "page_id",
    columns: &[
        Column::new("page_id", ColumnKind::Int),
        Column::new("page_name", ColumnKind::Text),
        Column::new("title", ColumnKind::Text),
        Column::new("content_html", ColumnKind::Text),
        Column::new("meta_description", ColumnKind::Text),
        Column::new("slug", ColumnKind::Text),
        Column::new("display_order", ColumnKind::Int),
    ],
    filterable: &["page_name", "title", "slug", "display_order"],
    searchable: &["title", "meta_description"],
    insertable: &["page_name", "title", "content_html", "meta_description", "slug", "display_order"],
    updatable: &["page_name", "title", "content_html", "meta_description", "slug", "display_order"],
    slug_column: Some("slug"),
    joins: &[],
    default_sort: "display_order",
    default_order: SortDirection::Asc,
    default_page_size: 10,
    max_page_size: 100,
    defaults: &[
        ("content_html", DefaultValue::Text("")),
        ("meta_description", DefaultValue::Text("")),
        ("display_order", DefaultValue::Int(0)),
    ],
    rules: &[
        FieldRule::new("page_name").required().non_blank().max_length(100),
        FieldRule::new("title").required().non_blank().max_length(255),
        FieldRule::new("meta_description").max_length(320),
        FieldRule::new("slug").required().non_blank().max_length(255).pattern(SLUG_PATTERN),
        FieldRule::new("display_order").minimum(0.0),
    ],
};
