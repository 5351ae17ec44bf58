//! Listing query parameters: raw query-string pairs parsed into a bounded, whitelisted descriptor.
//!
//! Parsing never fails. Malformed page, limit, sort or order values fall back to the
//! resource defaults, and keys that are not filterable columns are ignored.

use crate::config::ResourceDescriptor;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Keys with a fixed meaning; never treated as filters.
pub const RESERVED_KEYS: &[&str] = &["page", "limit", "sortBy", "order", "search"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive `asc` / `desc`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryDescriptor {
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    pub sort_by: &'static str,
    pub order: SortDirection,
    pub search: Option<String>,
    /// Equality filters in the resource's declared column order.
    pub filters: Vec<(&'static str, Value)>,
}

impl QueryDescriptor {
    pub fn parse(raw: &HashMap<String, String>, descriptor: &ResourceDescriptor) -> Self {
        let page = raw
            .get("page")
            .and_then(|v| positive(v))
            .unwrap_or(1);
        let page_size = raw
            .get("limit")
            .and_then(|v| positive(v))
            .unwrap_or(descriptor.default_page_size)
            .min(descriptor.max_page_size);
        let sort_by = raw
            .get("sortBy")
            .and_then(|v| descriptor.sort_key(v.trim()))
            .unwrap_or(descriptor.default_sort);
        let order = raw
            .get("order")
            .and_then(|v| SortDirection::parse(v))
            .unwrap_or(descriptor.default_order);
        let search = raw
            .get("search")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut filters = Vec::new();
        for &column in descriptor.filterable {
            if RESERVED_KEYS.contains(&column) {
                continue;
            }
            let Some(v) = raw.get(column).map(|v| v.trim()).filter(|v| !v.is_empty()) else {
                continue;
            };
            let Some(col) = descriptor.column(column) else { continue };
            if let Some(value) = col.kind.coerce(v) {
                filters.push((column, value));
            }
        }

        QueryDescriptor {
            page,
            page_size,
            sort_by,
            order,
            search,
            filters,
        }
    }

    /// Unfiltered first page in the resource's default order.
    pub fn first_page(descriptor: &ResourceDescriptor) -> Self {
        Self::parse(&HashMap::new(), descriptor)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// Integer >= 1; anything else (absent, zero, negative, non-numeric, overflowing) is None.
fn positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

/// One page of a listing plus the total match count.
#[derive(Clone, Debug, PartialEq)]
pub struct PageResult<T> {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub data: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn new(total: u64, query: &QueryDescriptor, data: Vec<T>) -> Self {
        PageResult {
            total,
            page: query.page,
            page_size: query.page_size,
            total_pages: total_pages(total, query.page_size),
            data,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            total: self.total,
            page: self.page,
            limit: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// `max(1, ceil(total / page_size))`.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1))).max(1)
}
