//! Peaks: the mountains themselves, ranked by height.

use crate::config::{Column, ColumnKind, DefaultValue, FieldRule, ResourceDescriptor, SLUG_PATTERN};
use crate::error::AppError;
use crate::query::SortDirection;
use crate::service::ResourceRepository;
use crate::sql::{FixedQuery, Predicate};
use serde_json::Value;

pub static PEAKS: ResourceDescriptor = ResourceDescriptor {
    name: "peak",
    path_segment: "peaks",
    table: "peaks",
    primary_key: "peak_id",
    columns: &[
        Column::new("peak_id", ColumnKind::Int),
        Column::new("name", ColumnKind::Text),
        Column::new("elevation_meters", ColumnKind::Int),
        Column::new("rank_in_world", ColumnKind::Int),
        Column::new("location", ColumnKind::Text),
        Column::new("description", ColumnKind::Text),
        Column::new("image_url", ColumnKind::Text),
        Column::new("slug", ColumnKind::Text),
    ],
    filterable: &["name", "elevation_meters", "rank_in_world", "location", "slug"],
    searchable: &["name", "location", "description"],
    insertable: &["name", "elevation_meters", "rank_in_world", "location", "description", "image_url", "slug"],
    updatable: &["name", "elevation_meters", "rank_in_world", "location", "description", "image_url", "slug"],
    slug_column: Some("slug"),
    joins: &[],
    default_sort: "rank_in_world",
    default_order: SortDirection::Asc,
    default_page_size: 10,
    max_page_size: 100,
    defaults: &[
        ("rank_in_world", DefaultValue::Null),
        ("description", DefaultValue::Text("")),
        ("image_url", DefaultValue::Text("")),
    ],
    rules: &[
        FieldRule::new("name").required().non_blank().max_length(255),
        FieldRule::new("elevation_meters").required().minimum(0.0).maximum(9000.0),
        FieldRule::new("rank_in_world").minimum(1.0),
        FieldRule::new("slug").required().non_blank().max_length(255).pattern(SLUG_PATTERN),
    ],
};

const TOP_DEFAULT: u32 = 10;
const TOP_MAX: u32 = 50;

/// Inclusive elevation bounds in meters, checked before any query is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationRange {
    pub min: f64,
    pub max: f64,
}

impl ElevationRange {
    pub fn new(min: f64, max: f64) -> Result<Self, AppError> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < 0.0 || min > max {
            return Err(AppError::Validation(
                "valid min and max elevation values are required".into(),
            ));
        }
        Ok(ElevationRange { min, max })
    }

    /// From raw query-string values; absent or non-numeric bounds are invalid.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Result<Self, AppError> {
        let num = |s: Option<&str>| s.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN);
        Self::new(num(min), num(max))
    }
}

/// Peaks whose elevation lies within the range, highest first.
pub async fn find_by_elevation(repo: &ResourceRepository, range: ElevationRange) -> Result<Vec<Value>, AppError> {
    repo.find_fixed(&FixedQuery {
        predicate: Predicate::Between {
            column: "elevation_meters",
            min: range.min,
            max: range.max,
        },
        order_by: "elevation_meters",
        order: SortDirection::Desc,
        limit: None,
    })
    .await
}

/// The `limit` best-ranked peaks; limit defaults to 10 and is clamped to 1..=50.
pub async fn top_peaks(repo: &ResourceRepository, limit: Option<i64>) -> Result<Vec<Value>, AppError> {
    let limit = limit
        .filter(|n| *n >= 1)
        .map(|n| n.min(i64::from(TOP_MAX)) as u32)
        .unwrap_or(TOP_DEFAULT);
    repo.find_fixed(&FixedQuery {
        predicate: Predicate::All,
        order_by: "rank_in_world",
        order: SortDirection::Asc,
        limit: Some(limit),
    })
    .await
}

/// The single best-ranked peak, if any peaks exist.
pub async fn highest_peak(repo: &ResourceRepository) -> Result<Option<Value>, AppError> {
    Ok(top_peaks(repo, Some(1)).await?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::ScriptedStorage;
    use crate::store::ExecResult;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn elevation_range_rejects_bad_bounds() {
        assert!(ElevationRange::new(8000.0, 8600.0).is_ok());
        assert!(ElevationRange::new(8000.0, 8000.0).is_ok());
        assert!(ElevationRange::new(8600.0, 8000.0).is_err());
        assert!(ElevationRange::new(-1.0, 8000.0).is_err());
        assert!(ElevationRange::parse(Some("8000"), None).is_err());
        assert!(ElevationRange::parse(Some("low"), Some("8000")).is_err());
        assert_eq!(
            ElevationRange::parse(Some(" 8000 "), Some("8600.5")).unwrap(),
            ElevationRange { min: 8000.0, max: 8600.5 }
        );
    }

    #[tokio::test]
    async fn elevation_query_is_bounded_and_descending() {
        let storage = Arc::new(ScriptedStorage::new().reply(ExecResult::rows(vec![json!({ "peak_id": 3 })])));
        let repo = ResourceRepository::new(storage.clone(), &PEAKS);
        let rows = find_by_elevation(&repo, ElevationRange::new(8000.0, 8600.0).unwrap()).await.unwrap();
        assert_eq!(rows.len(), 1);
        let q = &storage.statements()[0];
        assert!(q.sql.contains("BETWEEN $1::double precision AND $2::double precision"));
        assert!(q.sql.contains("ORDER BY main.\"elevation_meters\" DESC"));
        assert_eq!(q.params, vec![json!(8000.0), json!(8600.0)]);
    }

    #[tokio::test]
    async fn top_peaks_clamps_limit() {
        for (asked, bound) in [(None, 10), (Some(0), 10), (Some(3), 3), (Some(500), 50)] {
            let storage = Arc::new(ScriptedStorage::new().reply(ExecResult::rows(vec![])));
            let repo = ResourceRepository::new(storage.clone(), &PEAKS);
            top_peaks(&repo, asked).await.unwrap();
            let q = &storage.statements()[0];
            assert!(q.sql.contains("ORDER BY main.\"rank_in_world\" ASC"));
            assert_eq!(q.params, vec![json!(bound)], "limit for {:?}", asked);
        }
    }

    #[tokio::test]
    async fn highest_peak_is_first_by_rank() {
        let storage = Arc::new(ScriptedStorage::new().reply(ExecResult::rows(vec![json!({ "name": "Everest" })])));
        let repo = ResourceRepository::new(storage.clone(), &PEAKS);
        assert_eq!(highest_peak(&repo).await.unwrap(), Some(json!({ "name": "Everest" })));
        assert_eq!(storage.statements()[0].params, vec![json!(1)]);

        let repo = ResourceRepository::new(Arc::new(ScriptedStorage::new().reply(ExecResult::rows(vec![]))), &PEAKS);
        assert_eq!(highest_peak(&repo).await.unwrap(), None);
    }
}
