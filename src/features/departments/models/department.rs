use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document model for the `departments` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Departments created on first start: `(id, name, icon, color)`
pub const DEFAULT_DEPARTMENTS: [(&str, &str, &str, &str); 8] = [
    ("Garbage", "Garbage", "🗑️", "#22c55e"),
    ("Electricity", "Electricity", "⚡", "#eab308"),
    ("Water", "Water Supply", "💧", "#3b82f6"),
    ("Gas", "Sui Gas", "🔥", "#f97316"),
    ("Roads", "Roads & Infrastructure", "🛣️", "#6b7280"),
    ("Sewerage", "Sewerage", "🚰", "#14b8a6"),
    ("Streetlights", "Street Lights", "💡", "#f59e0b"),
    ("Other", "Other", "📋", "#8b5cf6"),
];
