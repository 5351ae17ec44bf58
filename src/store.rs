//! Storage collaborator: executes built statements against PostgreSQL and hands rows back as JSON.

use crate::sql::{PgBindValue, QueryBuf, StatementKind};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

/// Outcome of one statement. Which fields are meaningful depends on the statement kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecResult {
    pub rows: Vec<Value>,
    pub rows_affected: u64,
    pub inserted_id: Option<i64>,
}

impl ExecResult {
    pub fn rows(rows: Vec<Value>) -> Self {
        ExecResult {
            rows_affected: rows.len() as u64,
            rows,
            inserted_id: None,
        }
    }

    pub fn affected(n: u64) -> Self {
        ExecResult {
            rows_affected: n,
            ..Default::default()
        }
    }

    pub fn inserted(id: i64) -> Self {
        ExecResult {
            rows_affected: 1,
            inserted_id: Some(id),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn execute(&self, q: &QueryBuf) -> Result<ExecResult, sqlx::Error>;
}

/// `Storage` over a shared pool. Each statement checks a connection out for its own duration only.
#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        PgStorage { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn execute(&self, q: &QueryBuf) -> Result<ExecResult, sqlx::Error> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let result = match q.kind {
            StatementKind::Query => {
                let rows = query.fetch_all(&self.pool).await?;
                ExecResult::rows(rows.iter().map(row_to_json).collect())
            }
            StatementKind::Insert => {
                let row = query.fetch_one(&self.pool).await?;
                let id = row_to_json(&row)
                    .as_object()
                    .and_then(|m| m.values().next())
                    .and_then(Value::as_i64)
                    .ok_or_else(|| sqlx::Error::Protocol("insert did not return an integer key".into()))?;
                ExecResult::inserted(id)
            }
            StatementKind::Execute => ExecResult::affected(query.execute(&self.pool).await?.rows_affected()),
        };
        Ok(result)
    }
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        let v = cell_to_value(row, name);
        map.insert(name.to_string(), v);
    }
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(f64::from(n)) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}

/// Scripted `Storage` double: answers statements from a queue and records what it was asked.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct ScriptedStorage {
        replies: Mutex<VecDeque<Result<ExecResult, sqlx::Error>>>,
        pub seen: Mutex<Vec<QueryBuf>>,
    }

    impl ScriptedStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, r: ExecResult) -> Self {
            self.replies.lock().unwrap().push_back(Ok(r));
            self
        }

        pub fn fail(self, e: sqlx::Error) -> Self {
            self.replies.lock().unwrap().push_back(Err(e));
            self
        }

        pub fn statements(&self) -> Vec<QueryBuf> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Storage for ScriptedStorage {
        async fn execute(&self, q: &QueryBuf) -> Result<ExecResult, sqlx::Error> {
            self.seen.lock().unwrap().push(q.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected statement: {}", q.sql))
        }
    }
}
