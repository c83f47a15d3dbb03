//! Song recommendation service: content similarity, co-occurrence based
//! collaborative filtering, a hybrid blend of both, and popularity ranking
//! over a fixed catalogue.

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod synthetic;
