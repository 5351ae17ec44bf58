//! Descriptor validation: every whitelisted name must be a declared column, checked once at startup.

use crate::config::ResourceDescriptor;
use crate::error::ConfigError;
use std::collections::HashSet;

pub fn validate(descriptor: &ResourceDescriptor) -> Result<(), ConfigError> {
    let columns: HashSet<&str> = descriptor.columns.iter().map(|c| c.name).collect();
    let resource = descriptor.name;

    let check = |set: &'static str, names: Vec<&'static str>| -> Result<(), ConfigError> {
        match names.into_iter().find(|c| !columns.contains(c)) {
            Some(column) => Err(ConfigError::UnknownColumn { resource, set, column }),
            None => Ok(()),
        }
    };

    check("primary_key", vec![descriptor.primary_key])?;
    check("filterable", descriptor.filterable.to_vec())?;
    check("searchable", descriptor.searchable.to_vec())?;
    check("insertable", descriptor.insertable.to_vec())?;
    check("updatable", descriptor.updatable.to_vec())?;
    check("slug_column", descriptor.slug_column.into_iter().collect())?;
    check("joins", descriptor.joins.iter().map(|j| j.local_column).collect())?;
    check("defaults", descriptor.defaults.iter().map(|(c, _)| *c).collect())?;
    check("rules", descriptor.rules.iter().map(|r| r.column).collect())?;

    if descriptor.sort_key(descriptor.default_sort).is_none() {
        return Err(ConfigError::UnknownColumn {
            resource,
            set: "default_sort",
            column: descriptor.default_sort,
        });
    }

    let pk = descriptor.primary_key;
    if descriptor.insertable.contains(&pk) || descriptor.updatable.contains(&pk) {
        return Err(ConfigError::WritablePrimaryKey { resource, column: pk });
    }

    if descriptor.default_page_size == 0 || descriptor.default_page_size > descriptor.max_page_size {
        return Err(ConfigError::PageSize(resource));
    }
    Ok(())
}
