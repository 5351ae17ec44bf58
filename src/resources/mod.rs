//! Resource kinds served by the site: descriptors plus their fixed listings.

pub mod gallery;
pub mod navigation;
pub mod pages;
pub mod peaks;
pub mod trekking;

pub use gallery::GALLERY_IMAGES;
pub use navigation::NAVIGATION_MENU;
pub use pages::PAGES;
pub use peaks::PEAKS;
pub use trekking::TREKKING_ROUTES;
