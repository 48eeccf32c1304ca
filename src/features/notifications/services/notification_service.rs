use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::models::{NewNotification, Notification};
use crate::modules::document_store::{
    collections, encode, generate_id, query_any_of, DocumentStore, Fields, Filter,
};

/// Service for per-user notifications
pub struct NotificationService {
    store: Arc<dyn DocumentStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a new unread notification
    pub async fn add(&self, data: NewNotification) -> Result<Notification> {
        let id = generate_id();
        let notification = data.into_notification(id.clone(), Utc::now());
        let fields = encode(&notification)?;

        self.store
            .put(collections::NOTIFICATIONS, Some(&id), fields)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create notification: {:?}", e);
                AppError::from(e)
            })?;

        tracing::debug!(
            "Created notification {} for user {}",
            notification.id,
            notification.user_id
        );

        Ok(notification)
    }

    /// Notifications for one user id, newest first
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.list_for_owner_ids(&[user_id]).await
    }

    /// Notifications stored under any of the given ids, newest first
    pub async fn list_for_owner_ids(&self, owner_ids: &[&str]) -> Result<Vec<Notification>> {
        let docs = query_any_of(
            self.store.as_ref(),
            collections::NOTIFICATIONS,
            "userId",
            owner_ids,
        )
        .await?;

        let mut notifications = docs
            .into_iter()
            .map(|doc| doc.decode::<Notification>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Mark one notification read. Only its owner may do so.
    pub async fn mark_read(&self, user: &AuthenticatedUser, id: &str) -> Result<()> {
        let notification = self
            .store
            .get(collections::NOTIFICATIONS, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))?
            .decode::<Notification>()?;

        if !user.owns(&notification.user_id) {
            return Err(AppError::Forbidden(
                "Cannot modify another user's notification".to_string(),
            ));
        }

        self.store
            .update(collections::NOTIFICATIONS, id, read_flag())
            .await?;
        Ok(())
    }

    /// Mark every unread notification of the user read; returns how many changed
    pub async fn mark_all_read(&self, user: &AuthenticatedUser) -> Result<usize> {
        let mut unread = Vec::new();
        for owner_id in user.owner_ids() {
            let filter = Filter::new().eq("userId", owner_id).eq("read", false);
            unread.extend(
                self.store
                    .query(collections::NOTIFICATIONS, &filter)
                    .await?,
            );
        }

        let count = unread.len();
        futures::future::try_join_all(unread.iter().map(|doc| {
            self.store
                .update(collections::NOTIFICATIONS, &doc.id, read_flag())
        }))
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark notifications read: {:?}", e);
            AppError::from(e)
        })?;

        Ok(count)
    }
}

fn read_flag() -> Fields {
    let mut fields = Fields::new();
    fields.insert("read".to_string(), Value::Bool(true));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportStatus;
    use crate::features::users::models::UserRole;
    use crate::modules::document_store::MemoryDocumentStore;

    fn citizen() -> AuthenticatedUser {
        AuthenticatedUser {
            uid: "uid-1".to_string(),
            phone: Some("+15550001".to_string()),
            role: UserRole::Citizen,
        }
    }

    fn service() -> NotificationService {
        NotificationService::new(Arc::new(MemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn test_add_and_list_newest_first() {
        let service = service();
        let first = service
            .add(NewNotification::report_submitted("uid-1", "r1"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = service
            .add(NewNotification::report_status_changed(
                "+15550001",
                "r1",
                ReportStatus::Resolved,
            ))
            .await
            .unwrap();

        let listed = service
            .list_for_owner_ids(&citizen().owner_ids())
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        assert!(listed.iter().all(|n| !n.read));
    }

    #[tokio::test]
    async fn test_mark_read_requires_owner() {
        let service = service();
        let other = service
            .add(NewNotification::report_submitted("someone-else", "r9"))
            .await
            .unwrap();

        let err = service.mark_read(&citizen(), &other.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = service.mark_read(&citizen(), "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mark_read_and_mark_all_read() {
        let service = service();
        let user = citizen();
        let n1 = service
            .add(NewNotification::report_submitted("uid-1", "r1"))
            .await
            .unwrap();
        service
            .add(NewNotification::report_submitted("+15550001", "r2"))
            .await
            .unwrap();
        service
            .add(NewNotification::report_submitted("uid-1", "r3"))
            .await
            .unwrap();

        service.mark_read(&user, &n1.id).await.unwrap();
        let changed = service.mark_all_read(&user).await.unwrap();
        assert_eq!(changed, 2);

        let listed = service.list_for_owner_ids(&user.owner_ids()).await.unwrap();
        assert!(listed.iter().all(|n| n.read));
        assert_eq!(service.mark_all_read(&user).await.unwrap(), 0);
    }
}
