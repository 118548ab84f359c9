pub mod about;
pub mod auth;
pub mod contact;
pub mod crud;
pub mod dashboard;
pub mod extractors;
pub mod pages;
pub mod projects;
pub mod seed;
