use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, Postgres};
use validator::Validate;

use crate::entities::base::{Editable, Entity, EntityMeta};
use crate::entities::validation::{blank_to_none, validate_not_blank, validate_url};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub meta: EntityMeta,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub technologies: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub is_featured: bool,
}

impl Entity for Project {
    const TABLE: &'static str = "projects";
    const LABEL: &'static str = "Project";
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "description",
        "image_url",
        "technologies",
        "github_url",
        "live_url",
        "is_featured",
    ];

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn bind_columns<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values.push_bind(self.title.clone());
        values.push_bind(self.description.clone());
        values.push_bind(self.image_url.clone());
        values.push_bind(self.technologies.clone());
        values.push_bind(self.github_url.clone());
        values.push_bind(self.live_url.clone());
        values.push_bind(self.is_featured);
    }
}

impl Project {
    /// Technologies are stored comma separated.
    pub fn technology_list(&self) -> Vec<String> {
        self.technologies
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProjectForm {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    #[validate(length(max = 1000, message = "Technologies cannot exceed 1000 characters"))]
    pub technologies: Option<String>,

    #[validate(
        length(max = 1000, message = "GitHub URL cannot exceed 1000 characters"),
        custom(function = "validate_url")
    )]
    pub github_url: Option<String>,

    #[validate(
        length(max = 1000, message = "Live URL cannot exceed 1000 characters"),
        custom(function = "validate_url")
    )]
    pub live_url: Option<String>,

    #[serde(default)]
    pub is_featured: bool,
}

impl ProjectForm {
    pub fn normalized(self) -> Self {
        ProjectForm {
            title: self.title.trim().to_string(),
            technologies: blank_to_none(self.technologies),
            github_url: blank_to_none(self.github_url),
            live_url: blank_to_none(self.live_url),
            ..self
        }
    }
}

impl Editable for Project {
    type Form = ProjectForm;

    fn normalize(form: ProjectForm) -> ProjectForm {
        form.normalized()
    }

    fn from_form(form: ProjectForm) -> Self {
        Project {
            meta: EntityMeta::default(),
            title: form.title,
            description: form.description,
            image_url: None,
            technologies: form.technologies,
            github_url: form.github_url,
            live_url: form.live_url,
            is_featured: form.is_featured,
        }
    }

    /// The image is managed by the upload flow, not the form.
    fn apply_form(&mut self, form: ProjectForm) {
        self.title = form.title;
        self.description = form.description;
        self.technologies = form.technologies;
        self.github_url = form.github_url;
        self.live_url = form.live_url;
        self.is_featured = form.is_featured;
    }
}
