pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod db {
    pub mod models;
    pub mod query;
    pub mod repository;
}
pub mod api {
    pub mod catalog;
    pub mod errors;
}
