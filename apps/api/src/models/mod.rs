pub mod analysis;
pub mod resume;
pub mod schema;
pub mod upload;
