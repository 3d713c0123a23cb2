//! The HTTP access layer: route handlers that translate requests into store
//! operations and store outcomes into JSON responses and status codes.

pub mod expenses;
