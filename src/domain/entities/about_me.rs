use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, Postgres};
use uuid::Uuid;
use validator::Validate;

use crate::entities::base::{Editable, Entity, EntityMeta};
use crate::entities::validation::{blank_to_none, validate_not_blank, validate_url};
use crate::utils::markdown::safe_markdown_to_html;

// ───── Database Models ───────────────────────────────────────────────

/// Owner profile. At most one non-deleted row exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AboutMe {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub meta: EntityMeta,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub twitter_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

impl Entity for AboutMe {
    const TABLE: &'static str = "about_me";
    const LABEL: &'static str = "About Me";
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "short_description",
        "full_description",
        "twitter_url",
        "linkedin_url",
        "github_url",
    ];

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn bind_columns<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values.push_bind(self.title.clone());
        values.push_bind(self.short_description.clone());
        values.push_bind(self.full_description.clone());
        values.push_bind(self.twitter_url.clone());
        values.push_bind(self.linkedin_url.clone());
        values.push_bind(self.github_url.clone());
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AboutMeResponse {
    pub id: Uuid,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub full_description_html: String,
    pub twitter_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<AboutMe> for AboutMeResponse {
    fn from(about_me: AboutMe) -> Self {
        Self {
            id: about_me.meta.id,
            full_description_html: safe_markdown_to_html(&about_me.full_description),
            title: about_me.title,
            short_description: about_me.short_description,
            full_description: about_me.full_description,
            twitter_url: about_me.twitter_url,
            linkedin_url: about_me.linkedin_url,
            github_url: about_me.github_url,
            created_at: about_me.meta.created_at,
            updated_at: about_me.meta.updated_at,
        }
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AboutMeForm {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = 500, message = "Short description must be between 1 and 500 characters"),
        custom(function = "validate_not_blank")
    )]
    pub short_description: String,

    /// Markdown.
    #[validate(custom(function = "validate_not_blank"))]
    pub full_description: String,

    #[validate(custom(function = "validate_url"))]
    pub twitter_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub linkedin_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,
}

impl AboutMeForm {
    pub fn normalized(self) -> Self {
        AboutMeForm {
            twitter_url: blank_to_none(self.twitter_url),
            linkedin_url: blank_to_none(self.linkedin_url),
            github_url: blank_to_none(self.github_url),
            ..self
        }
    }
}

impl Editable for AboutMe {
    type Form = AboutMeForm;

    fn normalize(form: AboutMeForm) -> AboutMeForm {
        form.normalized()
    }

    fn from_form(form: AboutMeForm) -> Self {
        AboutMe {
            meta: EntityMeta::default(),
            title: form.title,
            short_description: form.short_description,
            full_description: form.full_description,
            twitter_url: form.twitter_url,
            linkedin_url: form.linkedin_url,
            github_url: form.github_url,
        }
    }

    fn apply_form(&mut self, form: AboutMeForm) {
        self.title = form.title;
        self.short_description = form.short_description;
        self.full_description = form.full_description;
        self.twitter_url = form.twitter_url;
        self.linkedin_url = form.linkedin_url;
        self.github_url = form.github_url;
    }
}
