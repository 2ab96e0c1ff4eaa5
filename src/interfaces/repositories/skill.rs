use async_trait::async_trait;

use crate::{
    entities::skill::{Skill, SkillInsert},
    errors::AppError,
    repositories::{memory::{rejected, MemoryStore}, not_found, sqlx_repo::{store_error, SqlxRepo}},
    schema::SKILLS,
};

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError>;
    async fn get_skill(&self, id: i32) -> Result<Skill, AppError>;
    /// Display order: `order` ascending, then id.
    async fn list_skills(&self) -> Result<Vec<Skill>, AppError>;
    async fn delete_skill(&self, id: i32) -> Result<(), AppError>;
}

#[async_trait]
impl SkillRepository for SqlxRepo {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let sql = SKILLS.insert_statement(&["name", "icon", "category", "description", "order"]);
        let skill = sqlx::query_as::<_, Skill>(&sql)
            .bind(&skill.name)
            .bind(&skill.icon)
            .bind(&skill.category)
            .bind(&skill.description)
            .bind(skill.order)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(skill)
    }

    async fn get_skill(&self, id: i32) -> Result<Skill, AppError> {
        let sql = format!("SELECT {} FROM skills WHERE id = $1", SKILLS.select_list());
        sqlx::query_as::<_, Skill>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Skill", id))
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let sql = format!("SELECT {} FROM skills ORDER BY \"order\", id", SKILLS.select_list());
        let skills = sqlx::query_as::<_, Skill>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(skills)
    }

    async fn delete_skill(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Skill", id));
        }
        Ok(())
    }
}

#[async_trait]
impl SkillRepository for MemoryStore {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let mut tables = self.write();
        if tables.skills.values().any(|s| s.name == skill.name) {
            return Err(rejected(AppError::unique(
                SKILLS.name,
                format!("skill '{}' already exists", skill.name),
            )));
        }

        let id = tables.next_id(&SKILLS);
        let skill = skill.clone().persist(id);
        tables.skills.insert(id, skill.clone());
        Ok(skill)
    }

    async fn get_skill(&self, id: i32) -> Result<Skill, AppError> {
        self.read()
            .skills
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Skill", id))
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        let mut skills: Vec<Skill> = self.read().skills.values().cloned().collect();
        skills.sort_by_key(|s| (s.order, s.id));
        Ok(skills)
    }

    async fn delete_skill(&self, id: i32) -> Result<(), AppError> {
        self.write()
            .skills
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Skill", id))
    }
}
