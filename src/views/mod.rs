pub mod admin;
pub mod auth;
pub mod chapters;
pub mod components;
pub mod homepage;
pub mod layout;
pub mod profile;
pub mod quiz;

pub use layout::{page, page_with_user, render, titled, Section};
