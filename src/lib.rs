pub mod config;
pub mod jobs;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod validation;
