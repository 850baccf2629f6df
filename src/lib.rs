//! Billtrack - company and invoice record keeping over PostgreSQL.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod startup;
pub mod telemetry;
