//! Core library for the job portal: skill matching, job search, application
//! intake with deduplication, and chat message ordering.

pub mod config;
pub mod error;
pub mod portal;
pub mod telemetry;
