pub mod auth;
pub mod daily_quiz;
pub mod google;
