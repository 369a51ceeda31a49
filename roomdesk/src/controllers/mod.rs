pub mod admin;
pub mod api;
pub mod auth;
pub mod health;
pub mod pages;
