pub mod types;
pub mod descriptor;
pub mod validator;
pub mod catalog;
pub mod settings;

pub use types::*;
pub use descriptor::*;
pub use validator::*;
pub use catalog::*;
pub use settings::*;
