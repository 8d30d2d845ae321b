//! Domain modules for the job portal.

pub mod applications;
pub mod chat;
pub mod jobs;
pub mod mail;
pub mod matching;
pub mod profiles;
pub mod resume;
pub mod store;
