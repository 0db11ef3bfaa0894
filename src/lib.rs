pub mod collector;
pub mod config;
pub mod cursor;
pub mod data_models;
pub mod error;
pub mod gopher;
pub mod paginator;
pub mod provider;
pub mod sanitize;
pub mod storage;
pub mod trends;
