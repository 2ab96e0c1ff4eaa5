use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    errors::AppError,
    schema::{Insertable, Table, DEFAULT_ORDER, EXPERIENCES, EXPERIENCE_DETAILS},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceKind {
    #[display("work")]
    Work,
    #[display("education")]
    Education,
}

impl ExperienceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceKind::Work => "work",
            ExperienceKind::Education => "education",
        }
    }
}

impl FromStr for ExperienceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(ExperienceKind::Work),
            "education" => Ok(ExperienceKind::Education),
            _ => Err(AppError::InternalError(format!("Unknown experience type: {s}"))),
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

/// Raw `experiences` row; `type` is plain text in the store.
#[derive(Debug, sqlx::FromRow)]
pub struct ExperienceRow {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub date: Option<String>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: ExperienceKind,
    pub order: i32,
}

impl TryFrom<ExperienceRow> for Experience {
    type Error = AppError;

    fn try_from(row: ExperienceRow) -> Result<Self, Self::Error> {
        Ok(Experience {
            id: row.id,
            title: row.title,
            subtitle: row.subtitle,
            date: row.date,
            kind: row.kind.parse()?,
            order: row.order,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExperienceInsert {
    pub title: String,
    pub subtitle: String,
    pub date: Option<String>,
    pub kind: ExperienceKind,
    pub order: i32,
}

impl ExperienceInsert {
    pub fn persist(self, id: i32) -> Experience {
        Experience {
            id,
            title: self.title,
            subtitle: self.subtitle,
            date: self.date,
            kind: self.kind,
            order: self.order,
        }
    }
}

/// One bullet point under an experience entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceDetail {
    pub id: i32,
    pub experience_id: i32,
    pub detail: String,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct ExperienceDetailInsert {
    pub experience_id: i32,
    pub detail: String,
    pub order: i32,
}

impl ExperienceDetailInsert {
    pub fn persist(self, id: i32) -> ExperienceDetail {
        ExperienceDetail {
            id,
            experience_id: self.experience_id,
            detail: self.detail,
            order: self.order,
        }
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExperience {
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: ExperienceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl Insertable for NewExperience {
    const TABLE: &'static Table = &EXPERIENCES;
}

impl NewExperience {
    pub fn prepare_for_insert(self) -> ExperienceInsert {
        ExperienceInsert {
            title: self.title,
            subtitle: self.subtitle,
            date: self.date,
            kind: self.kind,
            order: self.order.unwrap_or(DEFAULT_ORDER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExperienceDetail {
    pub experience_id: i32,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl Insertable for NewExperienceDetail {
    const TABLE: &'static Table = &EXPERIENCE_DETAILS;
}

impl NewExperienceDetail {
    pub fn prepare_for_insert(self) -> ExperienceDetailInsert {
        ExperienceDetailInsert {
            experience_id: self.experience_id,
            detail: self.detail,
            order: self.order.unwrap_or(DEFAULT_ORDER),
        }
    }
}
