// Library for tests to access modules

pub mod config;
pub mod history_repo;
pub mod models;
pub mod persist_worker;
pub mod routes;
pub mod sysinfo_repo;
pub mod worker;
