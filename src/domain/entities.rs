pub mod about_me;
pub mod base;
pub mod contact_message;
pub mod project;
pub mod responses;
pub mod resume_item;
pub mod skill;
pub mod token;
pub mod user;
pub mod validation;
