use std::cmp::Reverse;

use serde::Serialize;

use crate::{
    entities::{
        about_me::AboutMeResponse,
        project::Project,
        resume_item::{ResumeItem, ResumeItemType},
        skill::{Skill, SkillCategory},
    },
    errors::AppError,
    repositories::{store::Session, unit_of_work::UnitOfWork},
    use_cases::{about::current_about_me, crud},
};

/// Public resume page.
#[derive(Debug, Serialize)]
pub struct ResumeView {
    pub experiences: Vec<ResumeItem>,
    pub educations: Vec<ResumeItem>,
    pub professional_skills: Vec<Skill>,
    pub languages: Vec<Skill>,
    pub tools: Vec<Skill>,
    pub about_me: Option<AboutMeResponse>,
}

/// Public home page.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub featured_projects: Vec<Project>,
    pub about_me: Option<AboutMeResponse>,
}

pub async fn resume_view<S: Session>(uow: &mut UnitOfWork<S>) -> Result<ResumeView, AppError> {
    let items = uow.resume_items().get_all().await?;
    let skills = uow.skills().get_all().await?;
    let about_me = current_about_me(uow).await?.map(AboutMeResponse::from);

    let (mut experiences, mut educations): (Vec<_>, Vec<_>) = items
        .into_iter()
        .partition(|item| item.item_type == ResumeItemType::Experience);
    sort_resume_items(&mut experiences);
    sort_resume_items(&mut educations);

    let mut professional_skills = skills_in(&skills, SkillCategory::ProfessionalSkills);
    professional_skills.sort_by_key(|s| Reverse(s.display_order));

    let mut languages = skills_in(&skills, SkillCategory::Languages);
    languages.sort_by_key(|s| s.display_order);

    let mut tools = skills_in(&skills, SkillCategory::Tools);
    tools.sort_by_key(|s| s.display_order);

    Ok(ResumeView {
        experiences,
        educations,
        professional_skills,
        languages,
        tools,
        about_me,
    })
}

pub async fn home_view<S: Session>(uow: &mut UnitOfWork<S>) -> Result<HomeView, AppError> {
    let mut featured_projects = uow.projects().find(|p| p.is_featured).await?;
    featured_projects.sort_by(crud::newest_first);
    let about_me = current_about_me(uow).await?.map(AboutMeResponse::from);

    Ok(HomeView {
        featured_projects,
        about_me,
    })
}

/// Display order descending, then most recent start date. Undated items last.
pub fn sort_resume_items(items: &mut [ResumeItem]) {
    items.sort_by_key(|item| (Reverse(item.display_order), Reverse(item.start_date)));
}

fn skills_in(skills: &[Skill], category: SkillCategory) -> Vec<Skill> {
    skills
        .iter()
        .filter(|s| s.category == category)
        .cloned()
        .collect()
}
