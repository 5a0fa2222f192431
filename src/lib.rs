pub mod config;
pub mod entities;
pub mod error;
pub mod logging;
pub mod match_date;
pub mod match_filter;
pub mod match_projector;
pub mod pipeline;
pub mod sink;
pub mod source_loader;
pub mod sql_sink;
pub mod table;
