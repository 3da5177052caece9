pub mod config;
pub mod entry;
pub mod environment;
pub mod errors;
pub mod listing;
pub mod normalization;
pub mod routes;
pub mod store;
pub mod submission;
pub mod validation;
