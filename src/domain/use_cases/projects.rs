use uuid::Uuid;

use crate::{
    entities::{
        base::Editable,
        project::{Project, ProjectForm},
    },
    errors::AppError,
    repositories::{store::Session, unit_of_work::UnitOfWork},
    storage::images::{ImageStorage, ImageUpload},
    use_cases::crud,
};

/// Project CRUD with the optional image upload attached to create and edit.
pub struct ProjectHandler<'a, S: Session> {
    uow: &'a mut UnitOfWork<S>,
    images: &'a ImageStorage,
}

impl<'a, S: Session> ProjectHandler<'a, S> {
    pub fn new(uow: &'a mut UnitOfWork<S>, images: &'a ImageStorage) -> Self {
        ProjectHandler { uow, images }
    }

    pub async fn list(&mut self) -> Result<Vec<Project>, AppError> {
        crud::list(&mut *self.uow, crud::newest_first).await
    }

    pub async fn featured(&mut self) -> Result<Vec<Project>, AppError> {
        let mut featured = self.uow.projects().find(|p| p.is_featured).await?;
        featured.sort_by(crud::newest_first);
        Ok(featured)
    }

    pub async fn get(&mut self, id: Uuid) -> Result<Project, AppError> {
        crud::get(&mut *self.uow, id).await
    }

    pub async fn create(
        &mut self,
        form: ProjectForm,
        upload: Option<&ImageUpload>,
    ) -> Result<Project, AppError> {
        let form = crud::checked_form::<Project>(form)?;
        let image_url = self.images.save(upload).await?;

        let mut project = Project::from_form(form);
        project.image_url = image_url.clone();

        let staged = self.uow.projects().add(project);
        let saved = match staged {
            Ok(project) => self.uow.save_changes().await.map(|_| project),
            Err(e) => Err(e),
        };

        match saved {
            Ok(project) => {
                tracing::info!(id = %project.meta.id, "Project created");
                Ok(project)
            }
            Err(e) => {
                self.discard(image_url).await;
                Err(e)
            }
        }
    }

    /// The entity is saved before the replaced image is removed, so a failed
    /// cleanup never loses the edit.
    pub async fn update(
        &mut self,
        id: Uuid,
        form: ProjectForm,
        upload: Option<&ImageUpload>,
    ) -> Result<Project, AppError> {
        let form = crud::checked_form::<Project>(form)?;
        let mut project = self.get(id).await?;
        let new_image = self.images.save(upload).await?;

        project.apply_form(form);
        let replaced = match &new_image {
            Some(url) => project.image_url.replace(url.clone()),
            None => None,
        };

        let staged = self.uow.projects().update(project);
        let saved = match staged {
            Ok(project) => self.uow.save_changes().await.map(|_| project),
            Err(e) => Err(e),
        };

        match saved {
            Ok(project) => {
                if let Some(old) = replaced {
                    self.images.remove_best_effort(&old).await;
                }
                tracing::info!(%id, "Project updated");
                Ok(project)
            }
            Err(e) => {
                self.discard(new_image).await;
                Err(e)
            }
        }
    }

    /// A soft-deleted project keeps its image; a hard delete removes it.
    pub async fn delete(&mut self, id: Uuid, hard: bool) -> Result<(), AppError> {
        let image_url = if hard { self.stored_image(id).await? } else { None };

        crud::delete::<Project, S>(&mut *self.uow, id, hard).await?;

        if let Some(url) = image_url {
            self.images.remove_best_effort(&url).await;
        }
        Ok(())
    }

    // Purging an already soft-deleted project must still find its image.
    async fn stored_image(&mut self, id: Uuid) -> Result<Option<String>, AppError> {
        Ok(self
            .uow
            .projects()
            .get_by_id_including_deleted(id)
            .await?
            .and_then(|project| project.image_url))
    }

    async fn discard(&self, image_url: Option<String>) {
        if let Some(url) = image_url {
            tracing::warn!(url = %url, "Discarding image of a project that was not saved");
            self.images.remove_best_effort(&url).await;
        }
    }
}
