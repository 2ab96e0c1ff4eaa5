use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schema::{Insertable, Table, MESSAGES};

// ───── Database Models ───────────────────────────────────────────────

/// A contact-form submission. Never updated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct MessageInsert {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl MessageInsert {
    pub fn persist(self, id: i32) -> Message {
        Message {
            id,
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            created_at: self.created_at,
        }
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

impl Insertable for NewMessage {
    const TABLE: &'static Table = &MESSAGES;
}

impl NewMessage {
    pub fn prepare_for_insert(self) -> MessageInsert {
        MessageInsert {
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            created_at: super::now(),
        }
    }
}
