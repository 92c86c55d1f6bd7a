pub mod builder;
pub mod conditions;
pub mod dates;
pub mod error;
pub mod order;
pub mod params;
pub mod schema;
pub mod types;

pub use builder::ResourceQuery;
pub use error::QueryError;
pub use schema::{FieldSpec, ResourceSchema};
pub use types::*;
