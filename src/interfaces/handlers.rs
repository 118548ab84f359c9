pub mod about_me;
pub mod auth;
pub mod contact_messages;
pub mod home;
pub mod images;
pub mod json_error;
pub mod projects;
pub mod records;
pub mod system;
