pub mod batch;
pub mod config;
pub mod error;
pub mod feed;
pub mod omm;
pub mod pagination;
pub mod parser;
pub mod refresh;
pub mod server;
pub mod store;
pub mod tle;
