pub mod configuration;
pub mod entities;
pub mod errors;
pub mod value_objects;
