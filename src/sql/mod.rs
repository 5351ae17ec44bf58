//! Safe SQL builder: identifiers from descriptors only, values as parameters.

mod builder;
mod update;
pub mod params;
pub use builder::*;
pub use update::*;
pub use params::*;
