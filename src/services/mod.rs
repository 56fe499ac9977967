//! Service layer: table access and the light post-processing on top of it.

pub mod accounts;
pub mod analytics;
pub mod assistant;
pub mod directory;
pub mod domains;
pub mod search;
pub mod session;
