use serde::{Deserialize, Serialize};

use crate::schema::{Insertable, Table, DEFAULT_TAG_COLOR, TAGS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct TagInsert {
    pub name: String,
    pub color: String,
}

impl TagInsert {
    pub fn persist(self, id: i32) -> Tag {
        Tag {
            id,
            name: self.name,
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Insertable for NewTag {
    const TABLE: &'static Table = &TAGS;
}

impl NewTag {
    pub fn prepare_for_insert(self) -> TagInsert {
        TagInsert {
            name: self.name,
            color: self.color.unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string()),
        }
    }
}
