pub mod annotation;
pub mod candidate;
pub mod datasource;
pub mod record;
