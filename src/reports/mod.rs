pub mod client;
pub mod models;
pub mod source;

pub use client::{ReportClient, DEFAULT_BASE_URL};
pub use source::ReportSource;

#[cfg(test)]
pub mod testing;
