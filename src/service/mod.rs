//! ResourceRepository: generic CRUD over the safe SQL builder.

mod repository;
mod validation;
pub use repository::{parse_id, ResourceRepository};
pub use validation::RequestValidator;
