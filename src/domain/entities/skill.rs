use serde::{Deserialize, Serialize};

use crate::schema::{Insertable, Table, DEFAULT_ORDER, SKILLS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skill {
    pub id: i32,
    pub name: String,
    pub icon: String,
    pub category: String,
    pub description: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct SkillInsert {
    pub name: String,
    pub icon: String,
    pub category: String,
    pub description: Option<String>,
    pub order: i32,
}

impl SkillInsert {
    pub fn persist(self, id: i32) -> Skill {
        Skill {
            id,
            name: self.name,
            icon: self.icon,
            category: self.category,
            description: self.description,
            order: self.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSkill {
    pub name: String,
    pub icon: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl Insertable for NewSkill {
    const TABLE: &'static Table = &SKILLS;
}

impl NewSkill {
    pub fn prepare_for_insert(self) -> SkillInsert {
        SkillInsert {
            name: self.name,
            icon: self.icon,
            category: self.category,
            description: self.description,
            order: self.order.unwrap_or(DEFAULT_ORDER),
        }
    }
}
