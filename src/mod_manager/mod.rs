pub mod app;
pub mod business;
pub mod domain;
pub mod infra;
