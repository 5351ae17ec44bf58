//! Summit API: REST backend for peaks, trekking routes, gallery images, pages and navigation menus.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod resources;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{Catalog, ResourceDescriptor, Settings};
pub use error::{AppError, ConfigError};
pub use query::{PageResult, Pagination, QueryDescriptor, SortDirection};
pub use routes::{api_routes, app, common_routes, common_routes_with_ready};
pub use service::{RequestValidator, ResourceRepository};
pub use state::AppState;
pub use store::{ExecResult, PgStorage, Storage};
