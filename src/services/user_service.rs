use crate::api::controllers::dto::user_dto::{
    CreateUserRequest, PermissionsDTO, RegisterRequest, UpdateUserRequest, UserSession,
};
use crate::data::models::roles::UserRole;
use crate::data::models::user::{NewUser, UpdateUser, User};
use crate::data::repos::implementors::department_repo::DepartmentRepo;
use crate::data::repos::implementors::user_repo::UserRepo;
use crate::data::repos::traits::repository::Repository;
use crate::security::access::{SUPERADMIN_ONLY, require_department, require_role};
use crate::security::auth::{AuthService, MIN_PASSWORD_LENGTH};
use crate::security::jwt::JwtService;
use crate::services::errors::{UserServiceError, is_unique_violation};
use std::collections::HashMap;

const MAX_NAME_LENGTH: usize = 255;

pub fn validate_name(name: &str) -> Result<(), UserServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UserServiceError::Validation("The name field is required.".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserServiceError::Validation(
            "The name may not be greater than 255 characters.".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), UserServiceError> {
    let email = email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'));

    if !well_formed || email.chars().any(char::is_whitespace) {
        return Err(UserServiceError::Validation(
            "The email must be a valid email address.".into(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), UserServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserServiceError::Validation(format!(
            "The password must be at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }
    Ok(())
}

pub fn session(user: &User, department_name: Option<String>) -> UserSession {
    UserSession {
        user_id: user.user_id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        department_id: user.department_id,
        department_name,
    }
}

pub fn permissions(user: &User, department_name: Option<String>) -> PermissionsDTO {
    PermissionsDTO {
        is_super_admin: user.is_superadmin(),
        is_admin: user.is_admin(),
        is_student: user.is_student(),
        can_manage_users: user.is_superadmin(),
        can_manage_departments: user.is_superadmin(),
        can_approve_listings: user.role.is_staff(),
        can_create_listings: true,
        managed_department_id: user.is_admin().then_some(user.department_id).flatten(),
        managed_department_name: user.is_admin().then_some(department_name).flatten(),
    }
}

pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        UserService
    }

    async fn department_name(&self, department_id: Option<i32>) -> Result<Option<String>, UserServiceError> {
        match department_id {
            Some(id) => Ok(DepartmentRepo::new().get_by_id(id).await?.map(|d| d.name)),
            None => Ok(None),
        }
    }

    async fn ensure_department(&self, department_id: i32) -> Result<(), UserServiceError> {
        DepartmentRepo::new()
            .get_by_id(department_id)
            .await?
            .map(|_| ())
            .ok_or(UserServiceError::DepartmentNotFound)
    }

    async fn ensure_email_free(&self, email: &str, except: Option<i32>) -> Result<(), UserServiceError> {
        match UserRepo::new().get_by_email(email).await? {
            Some(existing) if Some(existing.user_id) != except => Err(UserServiceError::EmailTaken),
            _ => Ok(()),
        }
    }

    pub async fn session_for(&self, user: &User) -> Result<UserSession, UserServiceError> {
        let name = self.department_name(user.department_id).await?;
        Ok(session(user, name))
    }

    pub async fn sessions_for(&self, users: &[User]) -> Result<Vec<UserSession>, UserServiceError> {
        let names: HashMap<i32, String> = DepartmentRepo::new()
            .get_all()
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|d| (d.department_id, d.name))
            .collect();

        Ok(users
            .iter()
            .map(|u| {
                let name = u.department_id.and_then(|id| names.get(&id).cloned());
                session(u, name)
            })
            .collect())
    }

    pub async fn permissions_for(&self, user: &User) -> Result<PermissionsDTO, UserServiceError> {
        let name = self.department_name(user.department_id).await?;
        Ok(permissions(user, name))
    }

    /// Self sign-up. Superadmin accounts are only created from the admin CLI.
    pub async fn register(&self, req: RegisterRequest) -> Result<(User, String), UserServiceError> {
        validate_name(&req.name)?;
        validate_email(&req.email)?;
        validate_password(&req.password)?;
        if req.password != req.password_confirmation {
            return Err(UserServiceError::Validation(
                "The password confirmation does not match.".into(),
            ));
        }
        if req.role == UserRole::SuperAdmin {
            return Err(UserServiceError::Validation("The selected role is invalid.".into()));
        }

        self.ensure_department(req.department_id).await?;
        let email = req.email.trim().to_lowercase();
        self.ensure_email_free(&email, None).await?;

        let hash = AuthService::new().hash_password(&req.password).await?;

        let user = UserRepo::new()
            .create(NewUser {
                name: req.name.trim(),
                email: &email,
                password_hash: &hash,
                role: req.role,
                department_id: Some(req.department_id),
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    UserServiceError::EmailTaken
                } else {
                    UserServiceError::Database(e)
                }
            })?;

        let token = JwtService::new().generate_token(&user)?;
        tracing::info!(user_id = user.user_id, role = user.role.as_str(), "user registered");

        Ok((user, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), UserServiceError> {
        let user = UserRepo::new()
            .get_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(UserServiceError::InvalidCredentials)?;

        let valid = AuthService::new()
            .verify_password(password, &user.password_hash)
            .await?;
        if !valid {
            tracing::warn!(user_id = user.user_id, "failed login");
            return Err(UserServiceError::InvalidCredentials);
        }

        let token = JwtService::new().generate_token(&user)?;
        Ok((user, token))
    }

    /// Revokes every token issued to `user` so far.
    pub async fn logout(&self, user: &User) -> Result<(), UserServiceError> {
        UserRepo::new().bump_token_version(user.user_id).await?;
        tracing::info!(user_id = user.user_id, "user logged out");
        Ok(())
    }

    pub async fn list_users(&self, actor: &User) -> Result<Vec<User>, UserServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        Ok(UserRepo::new().get_all().await?.unwrap_or_default())
    }

    pub async fn department_users(&self, actor: &User, department_id: i32) -> Result<Vec<User>, UserServiceError> {
        require_department(actor, department_id, "view department users")?;
        Ok(UserRepo::new().get_by_department(department_id).await?)
    }

    pub async fn create_user(&self, actor: &User, req: CreateUserRequest) -> Result<User, UserServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        validate_name(&req.name)?;
        validate_email(&req.email)?;
        validate_password(&req.password)?;
        self.ensure_department(req.department_id).await?;

        let email = req.email.trim().to_lowercase();
        self.ensure_email_free(&email, None).await?;
        let hash = AuthService::new().hash_password(&req.password).await?;

        let user = UserRepo::new()
            .create(NewUser {
                name: req.name.trim(),
                email: &email,
                password_hash: &hash,
                role: req.role,
                department_id: Some(req.department_id),
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    UserServiceError::EmailTaken
                } else {
                    UserServiceError::Database(e)
                }
            })?;

        tracing::info!(actor = actor.user_id, user_id = user.user_id, "user created");
        Ok(user)
    }

    pub async fn update_user(
        &self,
        actor: &User,
        id: i32,
        req: UpdateUserRequest,
    ) -> Result<User, UserServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        let repo = UserRepo::new();
        repo.get_by_id(id).await?.ok_or(UserServiceError::UserNotFound)?;

        if let Some(name) = &req.name {
            validate_name(name)?;
        }
        let email = match &req.email {
            Some(email) => {
                validate_email(email)?;
                let email = email.trim().to_lowercase();
                self.ensure_email_free(&email, Some(id)).await?;
                Some(email)
            }
            None => None,
        };
        let hash = match &req.password {
            Some(password) => {
                validate_password(password)?;
                Some(AuthService::new().hash_password(password).await?)
            }
            None => None,
        };
        if let Some(department_id) = req.department_id {
            self.ensure_department(department_id).await?;
        }

        let form = UpdateUser {
            name: req.name.as_deref().map(str::trim),
            email: email.as_deref(),
            password_hash: hash.as_deref(),
            role: req.role,
            department_id: req.department_id.map(Some),
        };

        if form != UpdateUser::default() {
            repo.update(id, form).await.map_err(|e| {
                if is_unique_violation(&e) {
                    UserServiceError::EmailTaken
                } else {
                    UserServiceError::Database(e)
                }
            })?;
        }

        repo.get_by_id(id).await?.ok_or(UserServiceError::UserNotFound)
    }

    pub async fn delete_user(&self, actor: &User, id: i32) -> Result<(), UserServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        if actor.user_id == id {
            return Err(UserServiceError::Protected("You cannot delete your own account"));
        }

        let repo = UserRepo::new();
        repo.get_by_id(id).await?.ok_or(UserServiceError::UserNotFound)?;
        repo.delete(id).await?;

        tracing::info!(actor = actor.user_id, user_id = id, "user deleted");
        Ok(())
    }

    /// Sets the target's role. Plain admin grants and revokes never touch a superadmin.
    pub async fn change_role(
        &self,
        actor: &User,
        id: i32,
        role: UserRole,
        protect_superadmin: bool,
    ) -> Result<User, UserServiceError> {
        require_role(actor, SUPERADMIN_ONLY)?;
        let repo = UserRepo::new();
        let target = repo.get_by_id(id).await?.ok_or(UserServiceError::UserNotFound)?;

        if protect_superadmin && target.is_superadmin() {
            tracing::warn!(actor = actor.user_id, target = id, "refused to modify superadmin role");
            return Err(UserServiceError::Protected("Cannot modify super admin role"));
        }

        repo.update(
            id,
            UpdateUser {
                role: Some(role),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(actor = actor.user_id, target = id, role = role.as_str(), "role changed");
        repo.get_by_id(id).await?.ok_or(UserServiceError::UserNotFound)
    }

    pub async fn grant_admin(&self, actor: &User, id: i32) -> Result<User, UserServiceError> {
        self.change_role(actor, id, UserRole::Admin, true).await
    }

    pub async fn revoke_admin(&self, actor: &User, id: i32) -> Result<User, UserServiceError> {
        self.change_role(actor, id, UserRole::Student, true).await
    }

    pub async fn grant_superadmin(&self, actor: &User, id: i32) -> Result<User, UserServiceError> {
        self.change_role(actor, id, UserRole::SuperAdmin, false).await
    }

    pub async fn revoke_superadmin(&self, actor: &User, id: i32) -> Result<User, UserServiceError> {
        self.change_role(actor, id, UserRole::Student, false).await
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new()
    }
}
