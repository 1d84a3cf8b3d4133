pub mod datasets;
pub mod search;
pub mod tool_config;
