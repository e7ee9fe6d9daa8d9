// Library for tests to access modules

pub mod averages;
pub mod config;
pub mod error;
pub mod models;
pub mod readings_repo;
pub mod routes;
pub mod scheduler;
pub mod snapshot_cache;
pub mod store;
