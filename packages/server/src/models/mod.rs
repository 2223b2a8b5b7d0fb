pub mod ai;
pub mod auth;
pub mod challenge;
pub mod media;
pub mod profile;
pub mod scoring;
pub mod season;
pub mod shared;
