//! Resource descriptor: static, per-kind metadata that every query and mutation is checked against.

use crate::config::types::{Column, DefaultValue, FieldRule, JoinSpec};
use crate::query::SortDirection;

#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Singular display name, used in messages ("peak not found").
    pub name: &'static str,
    /// API path segment the resource is mounted under.
    pub path_segment: &'static str,
    pub table: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [Column],
    /// Usable as equality filters and as sort keys.
    pub filterable: &'static [&'static str],
    /// Matched by the free-text `search` term.
    pub searchable: &'static [&'static str],
    pub insertable: &'static [&'static str],
    pub updatable: &'static [&'static str],
    pub slug_column: Option<&'static str>,
    pub joins: &'static [JoinSpec],
    pub default_sort: &'static str,
    pub default_order: SortDirection,
    pub default_page_size: u32,
    pub max_page_size: u32,
    /// Filled in on create for omitted columns.
    pub defaults: &'static [(&'static str, DefaultValue)],
    pub rules: &'static [FieldRule],
}

impl ResourceDescriptor {
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whitelisted sort key matching `name`: a filterable column or the primary key.
    pub fn sort_key(&self, name: &str) -> Option<&'static str> {
        if name == self.primary_key {
            return Some(self.primary_key);
        }
        self.filterable.iter().copied().find(|c| *c == name)
    }

    pub fn is_updatable(&self, name: &str) -> bool {
        self.updatable.contains(&name)
    }

    pub fn default_for(&self, name: &str) -> Option<DefaultValue> {
        self.defaults.iter().find(|(c, _)| *c == name).map(|(_, d)| *d)
    }
}
