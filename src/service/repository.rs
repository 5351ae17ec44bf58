//! Generic repository: one instance per resource kind, parameterized by its descriptor.

use crate::config::ResourceDescriptor;
use crate::error::AppError;
use crate::query::{PageResult, QueryDescriptor};
use crate::service::RequestValidator;
use crate::sql::{
    build_update, delete, insert, select_by_column, select_fixed, select_page, FixedQuery, QueryBuf, UpdateOutcome,
};
use crate::store::Storage;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct ResourceRepository {
    storage: Arc<dyn Storage>,
    descriptor: &'static ResourceDescriptor,
}

impl ResourceRepository {
    pub fn new(storage: Arc<dyn Storage>, descriptor: &'static ResourceDescriptor) -> Self {
        ResourceRepository { storage, descriptor }
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    /// One page of matching rows plus the total match count.
    pub async fn find_all(&self, query: &QueryDescriptor) -> Result<PageResult<Value>, AppError> {
        let (select, count) = select_page(self.descriptor, query);
        let total = self.total(&count).await?;
        if total == 0 {
            return Ok(PageResult::new(0, query, Vec::new()));
        }
        let rows = self.storage.execute(&select).await?.rows;
        Ok(PageResult::new(total, query, rows))
    }

    /// Number of rows matching the query's filters and search, ignoring its page window.
    pub async fn count(&self, query: &QueryDescriptor) -> Result<u64, AppError> {
        let (_, count) = select_page(self.descriptor, query);
        self.total(&count).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Value>, AppError> {
        let id = validate_id(id)?;
        if !self.holds_key(id) {
            return Ok(None);
        }
        let q = select_by_column(self.descriptor, self.descriptor.primary_key, Value::from(id));
        Ok(self.storage.execute(&q).await?.rows.into_iter().next())
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Value>, AppError> {
        let column = self
            .descriptor
            .slug_column
            .ok_or_else(|| AppError::BadRequest(format!("{} has no slug lookup", self.descriptor.path_segment)))?;
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(AppError::Validation("slug is required".into()));
        }
        let q = select_by_column(self.descriptor, column, Value::String(slug.to_string()));
        Ok(self.storage.execute(&q).await?.rows.into_iter().next())
    }

    /// Rows matching a fixed, resource-specific predicate.
    pub async fn find_fixed(&self, fixed: &FixedQuery) -> Result<Vec<Value>, AppError> {
        let q = select_fixed(self.descriptor, fixed);
        Ok(self.storage.execute(&q).await?.rows)
    }

    /// Insert supplied fields merged with the resource's defaults, then return the stored row.
    pub async fn create(&self, fields: &Map<String, Value>) -> Result<Value, AppError> {
        RequestValidator::validate(fields, self.descriptor)?;
        let values = self.merged_with_defaults(fields);
        let q = insert(self.descriptor, &values);
        let id = self
            .storage
            .execute(&q)
            .await?
            .inserted_id
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::info!(resource = self.descriptor.name, id, "created");
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {}", self.descriptor.name, id)))
    }

    /// Apply a partial update. `None` when no row has this id.
    pub async fn update(&self, id: i64, payload: &Map<String, Value>) -> Result<Option<Value>, AppError> {
        let id = validate_id(id)?;
        RequestValidator::validate_partial(payload, self.descriptor)?;
        if !self.holds_key(id) {
            return Ok(None);
        }
        match build_update(self.descriptor, id, payload) {
            UpdateOutcome::NoOp => self.find_by_id(id).await,
            UpdateOutcome::Statement(q) => {
                if self.storage.execute(&q).await?.rows_affected == 0 {
                    return Ok(None);
                }
                tracing::info!(resource = self.descriptor.name, id, "updated");
                self.find_by_id(id).await
            }
        }
    }

    /// True iff exactly one row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let id = validate_id(id)?;
        if !self.holds_key(id) {
            return Ok(false);
        }
        let removed = self.storage.execute(&delete(self.descriptor, id)).await?.rows_affected == 1;
        if removed {
            tracing::info!(resource = self.descriptor.name, id, "deleted");
        }
        Ok(removed)
    }

    async fn total(&self, count: &QueryBuf) -> Result<u64, AppError> {
        Ok(self
            .storage
            .execute(count)
            .await?
            .rows
            .first()
            .and_then(|r| r.get("total"))
            .and_then(Value::as_u64)
            .unwrap_or(0))
    }

    /// Ids wider than the key column can store match no row.
    fn holds_key(&self, id: i64) -> bool {
        self.descriptor
            .column(self.descriptor.primary_key)
            .map_or(true, |c| c.kind.fits(id))
    }

    /// Insertable columns in declaration order: supplied value, else declared default, else omitted.
    fn merged_with_defaults(&self, fields: &Map<String, Value>) -> Vec<(&'static str, Value)> {
        self.descriptor
            .insertable
            .iter()
            .filter_map(|&col| match fields.get(col) {
                Some(v) => Some((col, v.clone())),
                None => self.descriptor.default_for(col).map(|d| (col, d.to_value())),
            })
            .collect()
    }
}

fn validate_id(id: i64) -> Result<i64, AppError> {
    if id <= 0 {
        return Err(AppError::Validation(format!("invalid id: {}", id)));
    }
    Ok(id)
}

/// Parse a path identifier: a positive integer, else a validation error.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("invalid id: {}", raw)))
        .and_then(validate_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{GALLERY_IMAGES, NAVIGATION_MENU, PEAKS};
    use crate::sql::StatementKind;
    use crate::store::testing::ScriptedStorage;
    use crate::store::ExecResult;
    use serde_json::json;
    use std::collections::HashMap;

    fn scripted(storage: ScriptedStorage, d: &'static ResourceDescriptor) -> (ResourceRepository, Arc<ScriptedStorage>) {
        let storage = Arc::new(storage);
        (ResourceRepository::new(storage.clone(), d), storage)
    }

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    fn everest() -> Value {
        json!({ "peak_id": 1, "name": "Everest", "elevation_meters": 8848, "rank_in_world": 1, "slug": "everest" })
    }

    #[tokio::test]
    async fn find_all_with_no_matches_is_a_single_empty_page() {
        let (repo, storage) = scripted(ScriptedStorage::new().reply(ExecResult::rows(vec![json!({ "total": 0 })])), &PEAKS);
        let page = repo.find_all(&QueryDescriptor::first_page(&PEAKS)).await.unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.data.is_empty());
        assert_eq!(storage.statements().len(), 1, "select is skipped when nothing matches");
    }

    #[tokio::test]
    async fn find_all_reports_pagination() {
        let rows = vec![everest(), json!({ "peak_id": 2 }), json!({ "peak_id": 3 })];
        let (repo, storage) = scripted(
            ScriptedStorage::new()
                .reply(ExecResult::rows(vec![json!({ "total": 3 })]))
                .reply(ExecResult::rows(rows.clone())),
            &PEAKS,
        );
        let raw: HashMap<String, String> = [("limit", "10"), ("sortBy", "rank_in_world"), ("order", "ASC")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let page = repo.find_all(&QueryDescriptor::parse(&raw, &PEAKS)).await.unwrap();
        let p = page.pagination();
        assert_eq!((p.total, p.page, p.limit, p.total_pages), (3, 1, 10, 1));
        assert_eq!(page.data, rows);
        let seen = storage.statements();
        assert!(seen[0].sql.starts_with("SELECT COUNT(*)"));
        assert!(seen[1].sql.contains("ORDER BY main.\"rank_in_world\" ASC"));
    }

    #[tokio::test]
    async fn find_by_id_absent_is_none() {
        let (repo, _) = scripted(ScriptedStorage::new().reply(ExecResult::rows(vec![])), &PEAKS);
        assert_eq!(repo.find_by_id(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn non_positive_id_fails_before_any_statement() {
        let (repo, storage) = scripted(ScriptedStorage::new(), &PEAKS);
        assert!(matches!(repo.find_by_id(0).await, Err(AppError::Validation(_))));
        assert!(matches!(repo.delete(-1).await, Err(AppError::Validation(_))));
        assert!(storage.statements().is_empty());
    }

    #[tokio::test]
    async fn slug_lookup() {
        let (repo, storage) = scripted(ScriptedStorage::new().reply(ExecResult::rows(vec![everest()])), &PEAKS);
        assert_eq!(repo.find_by_slug(" everest ").await.unwrap(), Some(everest()));
        assert_eq!(storage.statements()[0].params, vec![json!("everest")]);
        assert!(matches!(repo.find_by_slug("  ").await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn slug_lookup_on_resource_without_slug() {
        let (repo, _) = scripted(ScriptedStorage::new(), &GALLERY_IMAGES);
        assert!(matches!(repo.find_by_slug("x").await, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn create_merges_defaults_and_reads_back() {
        let stored = json!({ "image_id": 7, "title": "Dawn", "image_url": "/img/dawn.jpg", "category": "mountain", "is_featured": false });
        let (repo, storage) = scripted(
            ScriptedStorage::new()
                .reply(ExecResult::inserted(7))
                .reply(ExecResult::rows(vec![stored.clone()])),
            &GALLERY_IMAGES,
        );
        let created = repo
            .create(&obj(json!({ "title": "Dawn", "image_url": "/img/dawn.jpg", "upload_date": "2001-01-01" })))
            .await
            .unwrap();
        assert_eq!(created, stored);

        let seen = storage.statements();
        assert_eq!(seen[0].kind, StatementKind::Insert);
        assert!(seen[0].sql.starts_with(
            "INSERT INTO \"gallery_images\" (\"title\", \"alt_text\", \"image_url\", \"category\", \"related_peak_id\", \"related_route_id\", \"is_featured\")"
        ));
        assert_eq!(
            seen[0].params,
            vec![json!("Dawn"), json!(""), json!("/img/dawn.jpg"), json!("mountain"), Value::Null, Value::Null, json!(false)]
        );
        assert_eq!(seen[1].params, vec![json!(7)]);
    }

    #[tokio::test]
    async fn create_rejects_missing_required_without_touching_storage() {
        let (repo, storage) = scripted(ScriptedStorage::new(), &PEAKS);
        let err = repo.create(&obj(json!({ "name": "Nameless" }))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(storage.statements().is_empty());
    }

    #[tokio::test]
    async fn empty_or_unknown_update_is_noop_returning_current_row() {
        for payload in [json!({}), json!({ "unknownColumn": "x" })] {
            let (repo, storage) = scripted(ScriptedStorage::new().reply(ExecResult::rows(vec![everest()])), &PEAKS);
            let row = repo.update(1, &obj(payload)).await.unwrap();
            assert_eq!(row, Some(everest()));
            let seen = storage.statements();
            assert_eq!(seen.len(), 1);
            assert!(seen[0].sql.starts_with("SELECT"));
        }
    }

    #[tokio::test]
    async fn update_of_missing_row_is_none() {
        let (repo, storage) = scripted(ScriptedStorage::new().reply(ExecResult::affected(0)), &PEAKS);
        assert_eq!(repo.update(999, &obj(json!({ "name": "x" }))).await.unwrap(), None);
        assert_eq!(storage.statements().len(), 1);
    }

    #[tokio::test]
    async fn update_reads_back_fresh_row() {
        let renamed = json!({ "peak_id": 1, "name": "Sagarmatha" });
        let (repo, storage) = scripted(
            ScriptedStorage::new()
                .reply(ExecResult::affected(1))
                .reply(ExecResult::rows(vec![renamed.clone()])),
            &PEAKS,
        );
        assert_eq!(repo.update(1, &obj(json!({ "name": "Sagarmatha" }))).await.unwrap(), Some(renamed));
        assert!(storage.statements()[0].sql.starts_with("UPDATE \"peaks\" SET \"name\" = $1::text"));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let (found, _) = scripted(ScriptedStorage::new().reply(ExecResult::affected(1)), &NAVIGATION_MENU);
        assert!(found.delete(3).await.unwrap());
        let (missing, _) = scripted(ScriptedStorage::new().reply(ExecResult::affected(0)), &NAVIGATION_MENU);
        assert!(!missing.delete(3).await.unwrap());
    }

    #[tokio::test]
    async fn ids_beyond_the_key_column_are_absent_without_a_statement() {
        let (peaks, storage) = scripted(ScriptedStorage::new(), &PEAKS);
        let id = parse_id("3000000000").unwrap();
        assert_eq!(peaks.find_by_id(id).await.unwrap(), None);
        assert!(!peaks.delete(id).await.unwrap());
        assert_eq!(peaks.update(id, &obj(json!({ "name": "x" }))).await.unwrap(), None);
        assert!(storage.statements().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_integers_are_rejected_or_dropped() {
        let (peaks, storage) = scripted(ScriptedStorage::new().reply(ExecResult::rows(vec![json!({ "total": 0 })])), &PEAKS);
        let err = peaks.update(1, &obj(json!({ "rank_in_world": 99999999999i64 }))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let raw: HashMap<String, String> = [("rank_in_world".to_string(), "99999999999".to_string())].into();
        peaks.find_all(&QueryDescriptor::parse(&raw, &PEAKS)).await.unwrap();
        let seen = storage.statements();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].params.is_empty(), "unrepresentable filter is dropped");

        let (gallery, storage) = scripted(ScriptedStorage::new(), &GALLERY_IMAGES);
        let body = json!({ "title": "t", "image_url": "/i.jpg", "related_peak_id": 5000000000i64 });
        assert!(matches!(gallery.create(&obj(body)).await, Err(AppError::Validation(_))));
        assert!(storage.statements().is_empty());
    }

    #[tokio::test]
    async fn unparsable_timestamp_filter_is_dropped() {
        let (gallery, storage) = scripted(ScriptedStorage::new().reply(ExecResult::rows(vec![json!({ "total": 0 })])), &GALLERY_IMAGES);
        let raw: HashMap<String, String> = [("upload_date".to_string(), "yesterday-ish".to_string())].into();
        gallery.find_all(&QueryDescriptor::parse(&raw, &GALLERY_IMAGES)).await.unwrap();
        assert!(!storage.statements()[0].sql.contains("WHERE"));
    }

    #[tokio::test]
    async fn count_ignores_the_page_window() {
        let (peaks, storage) = scripted(ScriptedStorage::new().reply(ExecResult::rows(vec![json!({ "total": 14 })])), &PEAKS);
        assert_eq!(peaks.count(&QueryDescriptor::first_page(&PEAKS)).await.unwrap(), 14);
        assert_eq!(storage.statements()[0].sql, "SELECT COUNT(*) AS \"total\" FROM \"peaks\" main");
    }

    #[tokio::test]
    async fn storage_failures_propagate() {
        let (repo, _) = scripted(ScriptedStorage::new().fail(sqlx::Error::PoolTimedOut), &PEAKS);
        assert!(matches!(repo.find_by_id(1).await, Err(AppError::Db(sqlx::Error::PoolTimedOut))));
    }

    #[test]
    fn parse_id_requires_positive_integer() {
        assert_eq!(parse_id("12").unwrap(), 12);
        for bad in ["0", "-4", "abc", "1.5", ""] {
            assert!(matches!(parse_id(bad), Err(AppError::Validation(_))), "{:?}", bad);
        }
    }
}
