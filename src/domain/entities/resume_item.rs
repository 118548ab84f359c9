use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, Postgres};
use validator::{Validate, ValidationError};

use crate::entities::base::{Editable, Entity, EntityMeta};
use crate::entities::validation::{validate_date_range, validate_not_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resume_item_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResumeItemType {
    Experience,
    Education,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResumeItem {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub meta: EntityMeta,
    pub title: String,
    pub company_or_institution: String,
    pub location: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub display_order: i32,
    pub item_type: ResumeItemType,
}

impl Entity for ResumeItem {
    const TABLE: &'static str = "resume_items";
    const LABEL: &'static str = "Resume item";
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "company_or_institution",
        "location",
        "start_date",
        "end_date",
        "description",
        "display_order",
        "item_type",
    ];

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn bind_columns<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values.push_bind(self.title.clone());
        values.push_bind(self.company_or_institution.clone());
        values.push_bind(self.location.clone());
        values.push_bind(self.start_date);
        values.push_bind(self.end_date);
        values.push_bind(self.description.clone());
        values.push_bind(self.display_order);
        values.push_bind(self.item_type);
    }
}

impl ResumeItem {
    /// Still ongoing when no end date is recorded.
    pub fn is_current(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_resume_dates", skip_on_field_errors = false))]
pub struct ResumeItemForm {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = 200, message = "Company or institution must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub company_or_institution: String,

    #[serde(default)]
    #[validate(length(max = 200, message = "Location cannot exceed 200 characters"))]
    pub location: String,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    #[serde(default)]
    pub display_order: i32,

    pub item_type: ResumeItemType,
}

fn validate_resume_dates(form: &ResumeItemForm) -> Result<(), ValidationError> {
    validate_date_range(form.start_date, form.end_date)
}

impl Editable for ResumeItem {
    type Form = ResumeItemForm;

    fn from_form(form: ResumeItemForm) -> Self {
        ResumeItem {
            meta: EntityMeta::default(),
            title: form.title,
            company_or_institution: form.company_or_institution,
            location: form.location,
            start_date: form.start_date,
            end_date: form.end_date,
            description: form.description,
            display_order: form.display_order,
            item_type: form.item_type,
        }
    }

    fn apply_form(&mut self, form: ResumeItemForm) {
        self.title = form.title;
        self.company_or_institution = form.company_or_institution;
        self.location = form.location;
        self.start_date = form.start_date;
        self.end_date = form.end_date;
        self.description = form.description;
        self.display_order = form.display_order;
        self.item_type = form.item_type;
    }
}
