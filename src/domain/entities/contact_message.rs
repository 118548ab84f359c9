use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, Postgres};
use validator::Validate;

use crate::entities::base::{Editable, Entity, EntityMeta};
use crate::entities::validation::validate_not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactMessage {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
}

impl Entity for ContactMessage {
    const TABLE: &'static str = "contact_messages";
    const LABEL: &'static str = "Contact message";
    const COLUMNS: &'static [&'static str] = &["name", "email", "subject", "message", "is_read"];

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn bind_columns<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values.push_bind(self.name.clone());
        values.push_bind(self.email.clone());
        values.push_bind(self.subject.clone());
        values.push_bind(self.message.clone());
        values.push_bind(self.is_read);
    }
}

/// Public contact form submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactMessageForm {
    #[validate(
        length(min = 1, max = 100, message = "Name cannot exceed 100 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    pub name: String,

    #[validate(
        email(message = "Invalid email address"),
        length(max = 200, message = "Email cannot exceed 200 characters")
    )]
    pub email: String,

    #[validate(
        length(min = 1, max = 200, message = "Subject cannot exceed 200 characters"),
        custom(function = "validate_not_blank", message = "Subject is required")
    )]
    pub subject: String,

    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

impl Editable for ContactMessage {
    type Form = ContactMessageForm;

    /// New messages always start unread.
    fn from_form(form: ContactMessageForm) -> Self {
        ContactMessage {
            meta: EntityMeta::default(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            subject: form.subject.trim().to_string(),
            message: form.message,
            is_read: false,
        }
    }

    fn apply_form(&mut self, form: ContactMessageForm) {
        self.name = form.name.trim().to_string();
        self.email = form.email.trim().to_string();
        self.subject = form.subject.trim().to_string();
        self.message = form.message;
    }
}
