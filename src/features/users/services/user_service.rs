use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, TokenIdentity};
use crate::features::users::dtos::{
    CreateDepartmentUserDto, RegisterCitizenDto, UpdateDepartmentUserDto, UpdateProfileDto,
};
use crate::features::users::models::{PresenceStatus, User, UserRole};
use crate::modules::document_store::{
    collections, encode, generate_id, DocumentStore, Fields, Filter,
};
use crate::shared::validation::{require_non_empty, trim_to_option};

/// Service for user profiles and roles
pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Whether a citizen with this phone number is registered
    pub async fn check_user_exists(&self, phone: &str) -> Result<bool> {
        Ok(self.store.get(collections::USERS, phone).await?.is_some())
    }

    /// Create the citizen profile keyed by phone number
    pub async fn register_citizen(
        &self,
        dto: &RegisterCitizenDto,
        uid: Option<&str>,
    ) -> Result<User> {
        let phone = require_non_empty(&dto.phone, "Phone number")?;
        if self.check_user_exists(&phone).await? {
            return Err(AppError::Conflict(format!(
                "Phone number {} is already registered",
                phone
            )));
        }

        let first_name = dto.first_name.as_deref().unwrap_or("").trim().to_string();
        let last_name = dto.last_name.as_deref().unwrap_or("").trim().to_string();

        let mut user = User::new(phone.clone(), UserRole::Citizen);
        user.uid = uid.map(String::from);
        user.phone = Some(phone.clone());
        user.name = Some(format!("{} {}", first_name, last_name).trim().to_string());
        user.first_name = Some(first_name);
        user.last_name = Some(last_name);
        user.gender = trim_to_option(dto.gender.as_deref());
        user.status = Some(PresenceStatus::Active);
        user.updated_at = user.created_at;

        self.store
            .put(collections::USERS, Some(&phone), encode(&user)?)
            .await
            .map_err(|e| {
                tracing::error!("Failed to register citizen: {:?}", e);
                AppError::from(e)
            })?;

        tracing::info!("Registered citizen {}", phone);
        Ok(user)
    }

    /// Profile by document id, falling back to a match on the `uid` field
    pub async fn get_user_profile(&self, id: &str) -> Result<Option<User>> {
        if let Some(doc) = self.store.get(collections::USERS, id).await? {
            return Ok(Some(doc.decode()?));
        }

        let filter = Filter::new().eq("uid", id);
        let found = self.store.query(collections::USERS, &filter).await?;
        match found.into_iter().next() {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Profile of the calling user
    pub async fn get_own_profile(&self, user: &AuthenticatedUser) -> Result<User> {
        for id in [user.profile_id(), user.uid.as_str()] {
            if let Some(profile) = self.get_user_profile(id).await? {
                return Ok(profile);
            }
        }
        Err(AppError::NotFound("User profile not found".to_string()))
    }

    /// Link a citizen profile to its auth id. Failures are only logged.
    pub async fn update_user_auth_id(&self, phone: &str, uid: &str) {
        let mut fields = Fields::new();
        fields.insert("uid".into(), Value::String(uid.to_string()));
        fields.insert("updatedAt".into(), timestamp());

        if let Err(e) = self.store.update(collections::USERS, phone, fields).await {
            tracing::warn!("Failed to update auth id for user {}: {:?}", phone, e);
        }
    }

    pub async fn update_user_profile(&self, id: &str, dto: &UpdateProfileDto) -> Result<User> {
        let mut fields = Fields::new();
        if let Some(name) = &dto.name {
            fields.insert("name".into(), Value::String(require_non_empty(name, "Name")?));
        }
        if let Some(phone) = &dto.phone {
            fields.insert(
                "phone".into(),
                Value::String(require_non_empty(phone, "Phone number")?),
            );
        }
        fields.insert("updatedAt".into(), timestamp());

        self.store
            .update(collections::USERS, id, fields)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update profile {}: {:?}", id, e);
                AppError::from(e)
            })?;

        self.get_user_profile(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Whether `uid` belongs to an admin. Store failures read as "no".
    pub async fn verify_admin_role(&self, uid: &str) -> bool {
        match self.lookup_admin(uid).await {
            Ok(is_admin) => is_admin,
            Err(e) => {
                tracing::error!("Failed to verify admin role for {}: {:?}", uid, e);
                false
            }
        }
    }

    async fn lookup_admin(&self, uid: &str) -> Result<bool> {
        if uid.is_empty() {
            return Ok(false);
        }
        if let Some(doc) = self.store.get(collections::USERS, uid).await? {
            let user: User = doc.decode()?;
            return Ok(user.role == UserRole::Admin);
        }

        let filter = Filter::new()
            .eq("uid", uid)
            .eq("role", serde_json::to_value(UserRole::Admin)?);
        Ok(!self.store.query(collections::USERS, &filter).await?.is_empty())
    }

    /// Turn a verified token into the request's user, with its stored role.
    ///
    /// Callers without a profile yet are treated as citizens so they can
    /// register. Disabled accounts are rejected.
    pub async fn resolve_user(&self, identity: &TokenIdentity) -> Result<AuthenticatedUser> {
        let mut profile = self.get_user_profile(&identity.uid).await?;

        if profile.is_none() {
            if let Some(phone) = identity.phone.as_deref() {
                if let Some(doc) = self.store.get(collections::USERS, phone).await? {
                    let user: User = doc.decode()?;
                    if user.uid.as_deref() != Some(identity.uid.as_str()) {
                        self.update_user_auth_id(phone, &identity.uid).await;
                    }
                    profile = Some(user);
                }
            }
        }

        let Some(profile) = profile else {
            return Ok(AuthenticatedUser {
                uid: identity.uid.clone(),
                phone: identity.phone.clone(),
                role: UserRole::Citizen,
            });
        };

        if !profile.is_active {
            return Err(AppError::Forbidden("Account is disabled".to_string()));
        }

        // Ownership follows the verified token, never the editable profile phone
        Ok(AuthenticatedUser {
            uid: identity.uid.clone(),
            phone: identity.phone.clone(),
            role: profile.role,
        })
    }

    /// Department users, optionally limited to one department
    pub async fn list_department_users(&self, department_id: Option<&str>) -> Result<Vec<User>> {
        let mut filter = Filter::new().eq("role", serde_json::to_value(UserRole::DepartmentUser)?);
        if let Some(department_id) = department_id {
            filter = filter.eq("departmentId", department_id);
        }

        let docs = self.store.query(collections::USERS, &filter).await?;
        let mut users = docs
            .into_iter()
            .map(|doc| doc.decode::<User>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(users)
    }

    pub async fn create_department_user(
        &self,
        dto: &CreateDepartmentUserDto,
        created_by: &str,
    ) -> Result<User> {
        let email = dto.email.trim().to_lowercase();
        let existing = self
            .store
            .query(collections::USERS, &Filter::new().eq("email", email.as_str()))
            .await?;
        if !existing.is_empty() {
            return Err(AppError::Conflict(
                "This email is already registered".to_string(),
            ));
        }

        let id = trim_to_option(dto.uid.as_deref()).unwrap_or_else(generate_id);
        if self.store.get(collections::USERS, &id).await?.is_some() {
            return Err(AppError::Conflict(format!("User {} already exists", id)));
        }

        let mut user = User::new(id.clone(), UserRole::DepartmentUser);
        user.uid = trim_to_option(dto.uid.as_deref());
        user.full_name = Some(require_non_empty(&dto.full_name, "Full name")?);
        user.email = Some(email);
        user.phone = trim_to_option(dto.phone.as_deref());
        user.department_id = Some(require_non_empty(&dto.department_id, "Department")?);
        user.status = Some(PresenceStatus::Offline);
        user.created_by = Some(created_by.to_string());

        self.store
            .put(collections::USERS, Some(&id), encode(&user)?)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create department user: {:?}", e);
                AppError::from(e)
            })?;

        tracing::info!("Created department user {} by {}", id, created_by);
        Ok(user)
    }

    pub async fn update_department_user(
        &self,
        id: &str,
        dto: &UpdateDepartmentUserDto,
    ) -> Result<User> {
        let mut fields = Fields::new();
        if let Some(full_name) = trim_to_option(dto.full_name.as_deref()) {
            fields.insert("fullName".into(), Value::String(full_name));
        }
        if let Some(phone) = trim_to_option(dto.phone.as_deref()) {
            fields.insert("phone".into(), Value::String(phone));
        }
        if let Some(department_id) = trim_to_option(dto.department_id.as_deref()) {
            fields.insert("departmentId".into(), Value::String(department_id));
        }
        if let Some(status) = dto.status {
            fields.insert("status".into(), serde_json::to_value(status)?);
        }
        fields.insert("updatedAt".into(), timestamp());

        self.store.update(collections::USERS, id, fields).await?;
        self.get_department_user(id).await
    }

    /// Enable or disable a department user instead of deleting it
    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<User> {
        let status = if is_active {
            PresenceStatus::Offline
        } else {
            PresenceStatus::Disabled
        };

        let mut fields = Fields::new();
        fields.insert("isActive".into(), Value::Bool(is_active));
        fields.insert("status".into(), serde_json::to_value(status)?);
        fields.insert("updatedAt".into(), timestamp());

        self.store.update(collections::USERS, id, fields).await?;
        tracing::info!("User {} active set to {}", id, is_active);
        self.get_department_user(id).await
    }

    /// Record the caller's presence
    pub async fn update_presence(
        &self,
        user: &AuthenticatedUser,
        status: PresenceStatus,
    ) -> Result<()> {
        let profile = self.get_own_profile(user).await?;

        let mut fields = Fields::new();
        fields.insert("status".into(), serde_json::to_value(status)?);
        fields.insert("lastActive".into(), timestamp());

        self.store
            .update(collections::USERS, &profile.id, fields)
            .await?;
        Ok(())
    }

    async fn get_department_user(&self, id: &str) -> Result<User> {
        self.store
            .get(collections::USERS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?
            .decode()
            .map_err(AppError::from)
    }
}

fn timestamp() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true))
}
