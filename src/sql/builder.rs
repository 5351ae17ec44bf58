//! Builds parameterized SELECT, COUNT, INSERT and DELETE statements from a resource descriptor.
//! Identifiers only ever come from the descriptor; every value is a bound parameter.

use crate::config::ResourceDescriptor;
use crate::query::{QueryDescriptor, SortDirection};
use serde_json::Value;

/// Alias of the resource's own table in SELECT and COUNT.
const MAIN_ALIAS: &str = "main";

/// What the statement hands back when executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows.
    Query,
    /// Returns the generated primary key.
    Insert,
    /// Returns the affected row count.
    Execute,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
    pub kind: StatementKind,
}

impl QueryBuf {
    fn new(kind: StatementKind) -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
            kind,
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// Bind `v` and return its placeholder, cast to the column's type when the column is known.
    pub(crate) fn bind_for(&mut self, descriptor: &ResourceDescriptor, column: &str, v: Value) -> String {
        let n = self.push_param(v);
        match descriptor.column(column) {
            Some(c) => format!("${}::{}", n, c.kind.pg_type()),
            None => format!("${}", n),
        }
    }
}

/// Quote identifier for PostgreSQL (safe: only from descriptors).
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn main_col(column: &str) -> String {
    format!("{}.{}", MAIN_ALIAS, quoted(column))
}

/// `SELECT <columns + joined fields> FROM <table> main LEFT JOIN ...`
fn base_select(descriptor: &ResourceDescriptor) -> String {
    let mut fields: Vec<String> = descriptor.columns.iter().map(|c| main_col(c.name)).collect();
    let mut joins = String::new();
    for j in descriptor.joins {
        for (their, out) in j.fields {
            fields.push(format!("{}.{} AS {}", j.alias, quoted(their), quoted(out)));
        }
        joins.push_str(&format!(
            " LEFT JOIN {} {} ON {}.{} = {}",
            quoted(j.table),
            j.alias,
            j.alias,
            quoted(j.foreign_column),
            main_col(j.local_column)
        ));
    }
    format!(
        "SELECT {} FROM {} {}{}",
        fields.join(", "),
        quoted(descriptor.table),
        MAIN_ALIAS,
        joins
    )
}

/// Escape LIKE wildcards so the term matches literally, then wrap it for a substring match.
fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// WHERE clause for filters and search; params are pushed into `q` in clause order.
fn where_clause(descriptor: &ResourceDescriptor, query: &QueryDescriptor, q: &mut QueryBuf) -> String {
    let mut parts = Vec::new();
    for (col, val) in &query.filters {
        let ph = q.bind_for(descriptor, col, val.clone());
        parts.push(format!("{} = {}", main_col(col), ph));
    }
    if let Some(term) = &query.search {
        if !descriptor.searchable.is_empty() {
            let pattern = contains_pattern(term);
            let ors: Vec<String> = descriptor
                .searchable
                .iter()
                .map(|col| {
                    let n = q.push_param(Value::String(pattern.clone()));
                    format!("{} ILIKE ${}", main_col(col), n)
                })
                .collect();
            parts.push(format!("({})", ors.join(" OR ")));
        }
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// ORDER BY the validated key, then the primary key so pages never overlap on ties.
fn order_clause(descriptor: &ResourceDescriptor, sort_by: &str, order: SortDirection) -> String {
    if sort_by == descriptor.primary_key {
        format!(" ORDER BY {} {}", main_col(sort_by), order)
    } else {
        format!(
            " ORDER BY {} {}, {} ASC",
            main_col(sort_by),
            order,
            main_col(descriptor.primary_key)
        )
    }
}

/// Paged SELECT plus a COUNT over the same predicate (no joins, order or window).
pub fn select_page(descriptor: &ResourceDescriptor, query: &QueryDescriptor) -> (QueryBuf, QueryBuf) {
    let mut select = QueryBuf::new(StatementKind::Query);
    let filter = where_clause(descriptor, query, &mut select);
    let count = QueryBuf {
        sql: format!(
            "SELECT COUNT(*) AS \"total\" FROM {} {}{}",
            quoted(descriptor.table),
            MAIN_ALIAS,
            filter
        ),
        params: select.params.clone(),
        kind: StatementKind::Query,
    };
    let order = order_clause(descriptor, query.sort_by, query.order);
    let limit = select.push_param(Value::from(query.page_size));
    let offset = select.push_param(Value::from(query.offset()));
    select.sql = format!(
        "{}{}{} LIMIT ${} OFFSET ${}",
        base_select(descriptor),
        filter,
        order,
        limit,
        offset
    );
    (select, count)
}

/// SELECT the row(s) whose `column` equals `value`, with joins applied.
pub fn select_by_column(descriptor: &ResourceDescriptor, column: &str, value: Value) -> QueryBuf {
    let mut q = QueryBuf::new(StatementKind::Query);
    let ph = q.bind_for(descriptor, column, value);
    q.sql = format!("{} WHERE {} = {}", base_select(descriptor), main_col(column), ph);
    q
}

/// Fixed, non-configurable predicate for resource-specific listings.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Equals(&'static str, Value),
    /// Inclusive on both ends.
    Between { column: &'static str, min: f64, max: f64 },
    All,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FixedQuery {
    pub predicate: Predicate,
    pub order_by: &'static str,
    pub order: SortDirection,
    pub limit: Option<u32>,
}

pub fn select_fixed(descriptor: &ResourceDescriptor, fixed: &FixedQuery) -> QueryBuf {
    let mut q = QueryBuf::new(StatementKind::Query);
    let filter = match &fixed.predicate {
        Predicate::Equals(col, v) => {
            let ph = q.bind_for(descriptor, col, v.clone());
            format!(" WHERE {} = {}", main_col(col), ph)
        }
        Predicate::Between { column, min, max } => {
            let lo = q.push_param(Value::from(*min));
            let hi = q.push_param(Value::from(*max));
            format!(
                " WHERE {} BETWEEN ${}::double precision AND ${}::double precision",
                main_col(column),
                lo,
                hi
            )
        }
        Predicate::All => String::new(),
    };
    let order = order_clause(descriptor, fixed.order_by, fixed.order);
    let limit = match fixed.limit {
        Some(n) => format!(" LIMIT ${}", q.push_param(Value::from(n))),
        None => String::new(),
    };
    q.sql = format!("{}{}{}{}", base_select(descriptor), filter, order, limit);
    q
}

/// INSERT the given columns, returning the generated primary key.
/// Columns left out fall back to the database default.
pub fn insert(descriptor: &ResourceDescriptor, fields: &[(&'static str, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new(StatementKind::Insert);
    let pk = quoted(descriptor.primary_key);
    if fields.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", quoted(descriptor.table), pk);
        return q;
    }
    let mut cols = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    for (col, val) in fields {
        placeholders.push(q.bind_for(descriptor, col, val.clone()));
        cols.push(quoted(col));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(descriptor.table),
        cols.join(", "),
        placeholders.join(", "),
        pk
    );
    q
}

/// DELETE by primary key; the affected count tells whether the row existed.
pub fn delete(descriptor: &ResourceDescriptor, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new(StatementKind::Execute);
    let ph = q.bind_for(descriptor, descriptor.primary_key, Value::from(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(descriptor.table),
        quoted(descriptor.primary_key),
        ph
    );
    q
}
