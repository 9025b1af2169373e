pub mod builders;
pub mod catalog;
pub mod dispatcher;
pub mod services;
