use serde::{Deserialize, Serialize};
use sqlx::{query_builder::Separated, Postgres};
use validator::Validate;

use crate::entities::base::{Editable, Entity, EntityMeta};
use crate::entities::validation::validate_not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "skill_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    ProfessionalSkills,
    Languages,
    Tools,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skill {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub category: SkillCategory,
    pub display_order: i32,
}

impl Entity for Skill {
    const TABLE: &'static str = "skills";
    const LABEL: &'static str = "Skill";
    const COLUMNS: &'static [&'static str] = &["name", "category", "display_order"];

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn bind_columns<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values.push_bind(self.name.clone());
        values.push_bind(self.category);
        values.push_bind(self.display_order);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillForm {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    pub category: SkillCategory,

    #[serde(default)]
    pub display_order: i32,
}

impl Editable for Skill {
    type Form = SkillForm;

    fn from_form(form: SkillForm) -> Self {
        Skill {
            meta: EntityMeta::default(),
            name: form.name.trim().to_string(),
            category: form.category,
            display_order: form.display_order,
        }
    }

    fn apply_form(&mut self, form: SkillForm) {
        self.name = form.name.trim().to_string();
        self.category = form.category;
        self.display_order = form.display_order;
    }
}
