//! Partial UPDATE from a JSON payload: one SET clause per supplied updatable column.

use crate::config::ResourceDescriptor;
use crate::sql::builder::{quoted, QueryBuf, StatementKind};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// No updatable column was supplied; the caller returns the current row instead.
    NoOp,
    Statement(QueryBuf),
}

/// Build `UPDATE <table> SET a = $1, b = $2 WHERE <pk> = $3`.
///
/// SET clauses follow the payload's key order. Keys outside the resource's updatable
/// whitelist (primary key, generated or unknown columns) are dropped. An explicit
/// `null` is a value: it sets the column to NULL.
pub fn build_update(descriptor: &ResourceDescriptor, id: i64, payload: &Map<String, Value>) -> UpdateOutcome {
    let mut q = QueryBuf {
        sql: String::new(),
        params: Vec::new(),
        kind: StatementKind::Execute,
    };
    let mut sets = Vec::new();
    for (k, v) in payload {
        if !descriptor.is_updatable(k) {
            continue;
        }
        let ph = q.bind_for(descriptor, k, v.clone());
        sets.push(format!("{} = {}", quoted(k), ph));
    }
    if sets.is_empty() {
        return UpdateOutcome::NoOp;
    }
    let pk = descriptor.primary_key;
    let id_ph = q.bind_for(descriptor, pk, Value::from(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quoted(descriptor.table),
        sets.join(", "),
        quoted(pk),
        id_ph
    );
    UpdateOutcome::Statement(q)
}
