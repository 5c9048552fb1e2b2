//! Tenant, activity log and notification records.
//!
//! Activity logs and notifications are write-only sinks from the engine's
//! point of view; storage and delivery live elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A provider organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique identifier for the tenant.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// An audit record of something the engine did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Owning tenant.
    pub tenant_id: String,
    /// The user the action is attributed to.
    pub user_id: String,
    /// Machine-readable action, e.g. "budget_deduction".
    pub action: String,
    /// Kind of entity affected.
    pub entity_type: String,
    /// Identifier of the entity affected.
    pub entity_id: String,
    /// Human-readable summary.
    pub description: String,
    /// Structured context for replay.
    pub details: serde_json::Value,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Informational.
    Info,
    /// Needs attention.
    Warning,
}

/// A message to be delivered to a user by the notification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Owning tenant.
    pub tenant_id: String,
    /// Recipient.
    pub user_id: String,
    /// Severity.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// When the notification was raised.
    pub created_at: DateTime<Utc>,
}
