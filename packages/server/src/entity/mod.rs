pub mod badge;
pub mod challenge;
pub mod challenge_submission;
pub mod media_object;
pub mod score;
pub mod season;
pub mod season_member;
pub mod user;
pub mod user_badge;
pub mod user_profile;
