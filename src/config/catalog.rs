//! The set of resource kinds served by the site, validated once at startup.

use crate::config::{validate, ResourceDescriptor};
use crate::error::ConfigError;
use crate::resources::{GALLERY_IMAGES, NAVIGATION_MENU, PAGES, PEAKS, TREKKING_ROUTES};
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct Catalog {
    pub resources: Vec<&'static ResourceDescriptor>,
}

impl Catalog {
    /// All built-in resource kinds.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_descriptors(&[&PEAKS, &TREKKING_ROUTES, &GALLERY_IMAGES, &PAGES, &NAVIGATION_MENU])
    }

    pub fn from_descriptors(descriptors: &[&'static ResourceDescriptor]) -> Result<Self, ConfigError> {
        let mut paths = HashSet::new();
        for d in descriptors {
            validate(d)?;
            if !paths.insert(d.path_segment) {
                return Err(ConfigError::DuplicatePathSegment(d.path_segment));
            }
        }
        Ok(Catalog {
            resources: descriptors.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_resources_are_consistent() {
        let catalog = Catalog::load().unwrap();
        assert_eq!(catalog.resources.len(), 5);
        let paths: Vec<&str> = catalog.resources.iter().map(|d| d.path_segment).collect();
        assert_eq!(paths, ["peaks", "trekking", "gallery", "pages", "navigation"]);
    }

    #[test]
    fn duplicate_path_segment_is_rejected() {
        let err = Catalog::from_descriptors(&[&PEAKS, &PEAKS]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePathSegment("peaks")));
    }
}
