use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::departments::dtos::{CreateDepartmentDto, UpdateDepartmentDto};
use crate::features::departments::models::{Department, DEFAULT_DEPARTMENTS};
use crate::modules::document_store::{
    collections, encode, generate_id, DocumentStore, Fields, Filter,
};
use crate::shared::validation::{require_non_empty, trim_to_option};

/// Service for department operations
pub struct DepartmentService {
    store: Arc<dyn DocumentStore>,
}

impl DepartmentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every department, active or not, ordered by name
    pub async fn list_all(&self) -> Result<Vec<Department>> {
        let docs = self
            .store
            .query(collections::DEPARTMENTS, &Filter::new())
            .await
            .map_err(|e| {
                tracing::error!("Failed to list departments: {:?}", e);
                AppError::from(e)
            })?;

        let mut departments = docs
            .into_iter()
            .map(|doc| doc.decode::<Department>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    /// Departments citizens can file reports under
    pub async fn list_active(&self) -> Result<Vec<Department>> {
        let departments = self.list_all().await?;
        Ok(departments.into_iter().filter(|d| d.is_active).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Department> {
        self.store
            .get(collections::DEPARTMENTS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))?
            .decode()
            .map_err(AppError::from)
    }

    pub async fn create(&self, dto: &CreateDepartmentDto) -> Result<Department> {
        let department = Department {
            id: generate_id(),
            name: require_non_empty(&dto.name, "Name")?,
            icon: trim_to_option(dto.icon.as_deref()),
            color: trim_to_option(dto.color.as_deref()),
            is_active: true,
            created_at: Some(Utc::now()),
            updated_at: None,
        };

        self.store
            .put(
                collections::DEPARTMENTS,
                Some(&department.id),
                encode(&department)?,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to create department: {:?}", e);
                AppError::from(e)
            })?;

        tracing::info!("Created department: {} ({})", department.name, department.id);
        Ok(department)
    }

    pub async fn update(&self, id: &str, dto: &UpdateDepartmentDto) -> Result<Department> {
        let mut fields = Fields::new();
        if let Some(name) = &dto.name {
            fields.insert("name".into(), Value::String(require_non_empty(name, "Name")?));
        }
        if let Some(icon) = &dto.icon {
            fields.insert("icon".into(), Value::String(icon.trim().to_string()));
        }
        if let Some(color) = &dto.color {
            fields.insert("color".into(), Value::String(color.trim().to_string()));
        }
        if let Some(is_active) = dto.is_active {
            fields.insert("isActive".into(), Value::Bool(is_active));
        }
        fields.insert("updatedAt".into(), serde_json::to_value(Utc::now())?);

        self.store
            .update(collections::DEPARTMENTS, id, fields)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update department {}: {:?}", id, e);
                AppError::from(e)
            })?;

        self.get_by_id(id).await
    }

    /// Delete a department. Reports keep their category name.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.get_by_id(id).await?;
        self.store.delete(collections::DEPARTMENTS, id).await?;
        tracing::info!("Deleted department: {}", id);
        Ok(())
    }

    /// Insert the default departments when the collection is empty.
    /// Returns how many were inserted.
    pub async fn seed_defaults(&self) -> Result<usize> {
        let existing = self
            .store
            .query(collections::DEPARTMENTS, &Filter::new())
            .await?;
        if !existing.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        for (id, name, icon, color) in DEFAULT_DEPARTMENTS {
            let department = Department {
                id: id.to_string(),
                name: name.to_string(),
                icon: Some(icon.to_string()),
                color: Some(color.to_string()),
                is_active: true,
                created_at: Some(now),
                updated_at: None,
            };
            self.store
                .put(collections::DEPARTMENTS, Some(id), encode(&department)?)
                .await?;
        }

        tracing::info!("Seeded {} default departments", DEFAULT_DEPARTMENTS.len());
        Ok(DEFAULT_DEPARTMENTS.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::document_store::MemoryDocumentStore;

    fn service() -> DepartmentService {
        DepartmentService::new(Arc::new(MemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn test_seed_defaults_only_once() {
        let service = service();
        assert_eq!(service.seed_defaults().await.unwrap(), 8);
        assert_eq!(service.seed_defaults().await.unwrap(), 0);

        let all = service.list_all().await.unwrap();
        assert_eq!(all.len(), 8);
        assert!(all.iter().any(|d| d.name == "Sui Gas" && d.id == "Gas"));
    }

    #[tokio::test]
    async fn test_create_update_and_deactivate() {
        let service = service();
        let created = service
            .create(&CreateDepartmentDto {
                name: "  Parks ".into(),
                icon: Some("🌳".into()),
                color: Some("#16a34a".into()),
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Parks");
        assert!(created.is_active);

        let updated = service
            .update(
                &created.id,
                &UpdateDepartmentDto {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.name, "Parks");
        assert!(updated.updated_at.is_some());

        assert!(service.list_active().await.unwrap().is_empty());
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let service = service();
        let err = service
            .update("missing", &UpdateDepartmentDto::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service.delete("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_department() {
        let service = service();
        service.seed_defaults().await.unwrap();
        service.delete("Other").await.unwrap();
        assert_eq!(service.list_all().await.unwrap().len(), 7);
    }
}
