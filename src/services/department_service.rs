use crate::api::controllers::dto::department_dto::DepartmentForm;
use crate::data::models::department::{Department, NewDepartment, UpdateDepartment};
use crate::data::models::user::User;
use crate::data::repos::implementors::department_repo::DepartmentRepo;
use crate::data::repos::traits::repository::Repository;
use crate::security::access::{SUPERADMIN_ONLY, require_role};
use crate::services::errors::{DepartmentServiceError, is_unique_violation};
use crate::storage::{FileStorage, UploadKind, UploadedFile};

const MAX_NAME_LENGTH: usize = 255;
const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Uploaded images accompanying a department form.
#[derive(Debug, Default)]
pub struct DepartmentImages {
    pub logo: Option<UploadedFile>,
    pub gcash_qr_image: Option<UploadedFile>,
}

fn validated_name(name: Option<&str>) -> Result<&str, DepartmentServiceError> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(DepartmentServiceError::Validation("The name field is required.".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DepartmentServiceError::Validation(
            "The name may not be greater than 255 characters.".into(),
        ));
    }
    Ok(name)
}

fn validated_description(description: Option<&str>) -> Result<Option<&str>, DepartmentServiceError> {
    let description = description.map(str::trim).filter(|d| !d.is_empty());
    if description.is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH) {
        return Err(DepartmentServiceError::Validation(
            "The description may not be greater than 1000 characters.".into(),
        ));
    }
    Ok(description)
}

pub struct DepartmentService {
    storage: FileStorage,
}

impl DepartmentService {
    pub fn new() -> Self {
        Self::with_storage(FileStorage::new())
    }

    pub fn with_storage(storage: FileStorage) -> Self {
        DepartmentService { storage }
    }

    /// Every department, ordered by name.
    pub async fn list(&self) -> Result<Vec<Department>, DepartmentServiceError> {
        Ok(DepartmentRepo::new().get_all().await?.unwrap_or_default())
    }

    /// Departments with their `(users, listings)` counts.
    pub async fn list_with_counts(
        &self,
        actor: &User,
    ) -> Result<Vec<(Department, i64, i64)>, DepartmentServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        let repo = DepartmentRepo::new();

        let mut out = Vec::new();
        for department in repo.get_all().await?.unwrap_or_default() {
            let (users, listings) = repo.usage_counts(department.department_id).await?;
            out.push((department, users, listings));
        }

        Ok(out)
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> Result<(), DepartmentServiceError> {
        match DepartmentRepo::new().get_by_name(name).await? {
            Some(existing) if Some(existing.department_id) != except => {
                Err(DepartmentServiceError::NameTaken)
            }
            _ => Ok(()),
        }
    }

    async fn store_optional(
        &self,
        file: Option<&UploadedFile>,
        kind: UploadKind,
    ) -> Result<Option<String>, DepartmentServiceError> {
        match file {
            Some(file) => Ok(Some(self.storage.store(file, kind).await?)),
            None => Ok(None),
        }
    }

    async fn discard(&self, paths: &[Option<String>]) {
        for path in paths.iter().flatten() {
            self.storage.remove(path).await;
        }
    }

    pub async fn create(
        &self,
        actor: &User,
        form: DepartmentForm,
        images: DepartmentImages,
    ) -> Result<Department, DepartmentServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        let name = validated_name(form.name.as_deref())?;
        let description = validated_description(form.description.as_deref())?;
        self.ensure_name_free(name, None).await?;

        let logo = self.store_optional(images.logo.as_ref(), UploadKind::DepartmentLogo).await?;
        let qr = match self.store_optional(images.gcash_qr_image.as_ref(), UploadKind::GcashQr).await {
            Ok(qr) => qr,
            Err(e) => {
                self.discard(&[logo]).await;
                return Err(e);
            }
        };

        let created = DepartmentRepo::new()
            .create(NewDepartment {
                name,
                description,
                logo_path: logo.as_deref(),
                gcash_qr_image_path: qr.as_deref(),
            })
            .await;

        match created {
            Ok(department) => {
                tracing::info!(actor = actor.user_id, department_id = department.department_id, "department created");
                Ok(department)
            }
            Err(e) => {
                self.discard(&[logo, qr]).await;
                if is_unique_violation(&e) {
                    Err(DepartmentServiceError::NameTaken)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Replaces name and description; new images replace (and delete) the old files.
    pub async fn update(
        &self,
        actor: &User,
        id: i32,
        form: DepartmentForm,
        images: DepartmentImages,
    ) -> Result<Department, DepartmentServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        let repo = DepartmentRepo::new();
        let current = repo
            .get_by_id(id)
            .await?
            .ok_or(DepartmentServiceError::DepartmentNotFound)?;

        let name = validated_name(form.name.as_deref())?;
        let description = validated_description(form.description.as_deref())?;
        self.ensure_name_free(name, Some(id)).await?;

        let logo = self.store_optional(images.logo.as_ref(), UploadKind::DepartmentLogo).await?;
        let qr = match self.store_optional(images.gcash_qr_image.as_ref(), UploadKind::GcashQr).await {
            Ok(qr) => qr,
            Err(e) => {
                self.discard(&[logo]).await;
                return Err(e);
            }
        };

        let qr_change = match (&qr, form.remove_gcash_qr_image) {
            (Some(path), _) => Some(Some(path.as_str())),
            (None, true) => Some(None),
            (None, false) => None,
        };

        let qr_replaced = qr_change.is_some();
        let updated = repo
            .update(
                id,
                UpdateDepartment {
                    name: Some(name),
                    description: Some(description),
                    logo_path: logo.as_deref().map(Some),
                    gcash_qr_image_path: qr_change,
                },
            )
            .await;

        if let Err(e) = updated {
            self.discard(&[logo, qr]).await;
            return Err(if is_unique_violation(&e) {
                DepartmentServiceError::NameTaken
            } else {
                e.into()
            });
        }

        if logo.is_some() {
            self.discard(&[current.logo_path.clone()]).await;
        }
        if qr_replaced {
            self.discard(&[current.gcash_qr_image_path.clone()]).await;
        }

        tracing::info!(actor = actor.user_id, department_id = id, "department updated");
        repo.get_by_id(id)
            .await?
            .ok_or(DepartmentServiceError::DepartmentNotFound)
    }

    /// Refused while users or listings still belong to the department.
    pub async fn delete(&self, actor: &User, id: i32) -> Result<(), DepartmentServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        let repo = DepartmentRepo::new();
        let department = repo
            .get_by_id(id)
            .await?
            .ok_or(DepartmentServiceError::DepartmentNotFound)?;

        let (users, listings) = repo.usage_counts(id).await?;
        if users > 0 || listings > 0 {
            return Err(DepartmentServiceError::InUse { users, listings });
        }

        repo.delete(id).await?;
        self.discard(&[department.logo_path, department.gcash_qr_image_path])
            .await;

        tracing::info!(actor = actor.user_id, department_id = id, "department deleted");
        Ok(())
    }
}

impl Default for DepartmentService {
    fn default() -> Self {
        Self::new()
    }
}
