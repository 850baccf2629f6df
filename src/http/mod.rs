//! HTTP handlers and middleware.

pub mod companies;
pub mod invoices;
pub mod middleware;
