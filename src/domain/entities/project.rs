use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schema::{Insertable, Table, PROJECTS};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub github: String,
    pub live_url: Option<String>,
    pub featured: bool,
    pub created_at: NaiveDateTime,
}

/// Project ready to be written, with every default resolved.
#[derive(Debug, Clone)]
pub struct ProjectInsert {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub github: String,
    pub live_url: Option<String>,
    pub featured: bool,
    pub created_at: NaiveDateTime,
}

impl ProjectInsert {
    pub fn persist(self, id: i32) -> Project {
        Project {
            id,
            title: self.title,
            description: self.description,
            image: self.image,
            github: self.github,
            live_url: self.live_url,
            featured: self.featured,
            created_at: self.created_at,
        }
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub github: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl Insertable for NewProject {
    const TABLE: &'static Table = &PROJECTS;
}

impl NewProject {
    pub fn prepare_for_insert(self) -> ProjectInsert {
        ProjectInsert {
            title: self.title,
            description: self.description,
            image: self.image,
            github: self.github,
            live_url: self.live_url,
            featured: self.featured.unwrap_or(false),
            created_at: super::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn featured_defaults_to_false() {
        let insert = NewProject {
            title: "Portfolio".into(),
            description: "...".into(),
            image: None,
            github: "https://github.com/x/y".into(),
            live_url: None,
            featured: None,
        }
        .prepare_for_insert();

        assert!(!insert.featured);
        assert!(insert.live_url.is_none());
    }
}
