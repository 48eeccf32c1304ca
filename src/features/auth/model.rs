use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::UserRole;

/// Identity proven by a verified ID token, before any role lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub uid: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Auth-assigned user id
    pub uid: String,
    /// Verified phone number; citizens' user documents are keyed by it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Every id this user may own documents under (uid first, then phone)
    pub fn owner_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.uid.as_str()];
        if let Some(phone) = self.phone.as_deref() {
            if phone != self.uid {
                ids.push(phone);
            }
        }
        ids
    }

    /// Whether a document owned by `user_id` belongs to this user
    pub fn owns(&self, user_id: &str) -> bool {
        self.owner_ids().contains(&user_id)
    }

    /// Id of the user's own profile document
    pub fn profile_id(&self) -> &str {
        self.phone.as_deref().unwrap_or(&self.uid)
    }

    /// Key used for per-user session state
    pub fn session_key(&self) -> &str {
        &self.uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citizen(phone: Option<&str>) -> AuthenticatedUser {
        AuthenticatedUser {
            uid: "uid-1".to_string(),
            phone: phone.map(String::from),
            role: UserRole::Citizen,
        }
    }

    #[test]
    fn test_owner_ids_include_phone() {
        let user = citizen(Some("+15550001"));
        assert_eq!(user.owner_ids(), vec!["uid-1", "+15550001"]);
        assert!(user.owns("+15550001"));
        assert!(!user.owns("someone-else"));
    }

    #[test]
    fn test_owner_ids_without_phone() {
        let user = citizen(None);
        assert_eq!(user.owner_ids(), vec!["uid-1"]);
        assert_eq!(user.profile_id(), "uid-1");
    }

    #[test]
    fn test_is_admin() {
        let mut user = citizen(None);
        assert!(!user.is_admin());
        user.role = UserRole::Admin;
        assert!(user.is_admin());
    }
}
