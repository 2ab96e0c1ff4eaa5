use serde::{Deserialize, Serialize};

use crate::schema::{Insertable, Table, PROJECT_TAGS};

/// Association between a project and a tag. The pair is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTag {
    pub project_id: i32,
    pub tag_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectTag {
    pub project_id: i32,
    pub tag_id: i32,
}

impl Insertable for NewProjectTag {
    const TABLE: &'static Table = &PROJECT_TAGS;
}

impl NewProjectTag {
    pub fn new(project_id: i32, tag_id: i32) -> Self {
        NewProjectTag { project_id, tag_id }
    }

    pub fn persist(self) -> ProjectTag {
        ProjectTag {
            project_id: self.project_id,
            tag_id: self.tag_id,
        }
    }
}
