//! Tracked GitHub repositories and their pull requests
//!
//! - REST API endpoints in `endpoints/`
//! - PostgreSQL entities, queries and the store in `db/`
//! - repository and pull request orchestration in `services/`
//! - JSON response models in `models/`
//! - Reads GITHUB_TOKEN for upstream access, see `config`

pub mod config;
pub mod db;
pub mod endpoints;
pub mod models;
pub mod services;

#[cfg(test)]
mod test_support;
