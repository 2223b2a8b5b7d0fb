pub mod auth;
pub mod challenge;
pub mod scoring;
pub mod season;
pub mod user;
