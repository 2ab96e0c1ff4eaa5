use async_trait::async_trait;

use crate::{
    entities::experience::{
        Experience, ExperienceDetail, ExperienceDetailInsert, ExperienceInsert, ExperienceKind,
        ExperienceRow,
    },
    errors::AppError,
    repositories::{
        memory::{rejected, MemoryStore},
        not_found,
        sqlx_repo::{store_error, SqlxRepo},
    },
    schema::{EXPERIENCES, EXPERIENCE_DETAILS},
};

#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError>;
    async fn get_experience(&self, id: i32) -> Result<Experience, AppError>;
    /// Display order: `order` ascending, then id. `kind` filters when given.
    async fn list_experiences(&self, kind: Option<ExperienceKind>) -> Result<Vec<Experience>, AppError>;
    /// Deletes the experience together with its details.
    async fn delete_experience(&self, id: i32) -> Result<(), AppError>;

    async fn add_detail(&self, detail: &ExperienceDetailInsert) -> Result<ExperienceDetail, AppError>;
    /// Details of an experience: `order` ascending, ties by id.
    async fn details_for_experience(&self, experience_id: i32) -> Result<Vec<ExperienceDetail>, AppError>;
    async fn delete_detail(&self, id: i32) -> Result<(), AppError>;
}

#[async_trait]
impl ExperienceRepository for SqlxRepo {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError> {
        let sql = EXPERIENCES.insert_statement(&["title", "subtitle", "date", "type", "order"]);
        let row = sqlx::query_as::<_, ExperienceRow>(&sql)
            .bind(&experience.title)
            .bind(&experience.subtitle)
            .bind(&experience.date)
            .bind(experience.kind.as_str())
            .bind(experience.order)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        row.try_into()
    }

    async fn get_experience(&self, id: i32) -> Result<Experience, AppError> {
        let sql = format!("SELECT {} FROM experiences WHERE id = $1", EXPERIENCES.select_list());
        sqlx::query_as::<_, ExperienceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Experience", id))?
            .try_into()
    }

    async fn list_experiences(&self, kind: Option<ExperienceKind>) -> Result<Vec<Experience>, AppError> {
        let sql = format!(
            r#"SELECT {}
            FROM experiences
            WHERE $1::text IS NULL OR "type" = $1
            ORDER BY "order", id"#,
            EXPERIENCES.select_list()
        );
        sqlx::query_as::<_, ExperienceRow>(&sql)
            .bind(kind.map(|k| k.as_str()))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Experience::try_from)
            .collect()
    }

    async fn delete_experience(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let details = sqlx::query("DELETE FROM experience_details WHERE experience_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Experience", id));
        }

        tx.commit().await?;
        tracing::debug!(id, details = details.rows_affected(), "Deleted experience");
        Ok(())
    }

    async fn add_detail(&self, detail: &ExperienceDetailInsert) -> Result<ExperienceDetail, AppError> {
        let sql = EXPERIENCE_DETAILS.insert_statement(&["experience_id", "detail", "order"]);
        let detail = sqlx::query_as::<_, ExperienceDetail>(&sql)
            .bind(detail.experience_id)
            .bind(&detail.detail)
            .bind(detail.order)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(detail)
    }

    async fn details_for_experience(&self, experience_id: i32) -> Result<Vec<ExperienceDetail>, AppError> {
        if !self.exists(&EXPERIENCES, experience_id).await? {
            return Err(not_found("Experience", experience_id));
        }

        let sql = format!(
            r#"SELECT {}
            FROM experience_details
            WHERE experience_id = $1
            ORDER BY "order", id"#,
            EXPERIENCE_DETAILS.select_list()
        );
        let details = sqlx::query_as::<_, ExperienceDetail>(&sql)
            .bind(experience_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(details)
    }

    async fn delete_detail(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM experience_details WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Experience detail", id));
        }
        Ok(())
    }
}

#[async_trait]
impl ExperienceRepository for MemoryStore {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError> {
        let mut tables = self.write();
        let id = tables.next_id(&EXPERIENCES);
        let experience = experience.clone().persist(id);
        tables.experiences.insert(id, experience.clone());
        Ok(experience)
    }

    async fn get_experience(&self, id: i32) -> Result<Experience, AppError> {
        self.read()
            .experiences
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Experience", id))
    }

    async fn list_experiences(&self, kind: Option<ExperienceKind>) -> Result<Vec<Experience>, AppError> {
        let mut experiences: Vec<Experience> = self
            .read()
            .experiences
            .values()
            .filter(|e| kind.is_none_or(|k| e.kind == k))
            .cloned()
            .collect();
        experiences.sort_by_key(|e| (e.order, e.id));
        Ok(experiences)
    }

    async fn delete_experience(&self, id: i32) -> Result<(), AppError> {
        let mut tables = self.write();
        if tables.experiences.remove(&id).is_none() {
            return Err(not_found("Experience", id));
        }
        tables.experience_details.retain(|_, d| d.experience_id != id);
        Ok(())
    }

    async fn add_detail(&self, detail: &ExperienceDetailInsert) -> Result<ExperienceDetail, AppError> {
        let mut tables = self.write();
        if !tables.experiences.contains_key(&detail.experience_id) {
            return Err(rejected(AppError::foreign_key(
                EXPERIENCE_DETAILS.name,
                format!("experience {} does not exist", detail.experience_id),
            )));
        }

        let id = tables.next_id(&EXPERIENCE_DETAILS);
        let detail = detail.clone().persist(id);
        tables.experience_details.insert(id, detail.clone());
        Ok(detail)
    }

    async fn details_for_experience(&self, experience_id: i32) -> Result<Vec<ExperienceDetail>, AppError> {
        let tables = self.read();
        if !tables.experiences.contains_key(&experience_id) {
            return Err(not_found("Experience", experience_id));
        }
        Ok(tables.details_of(experience_id))
    }

    async fn delete_detail(&self, id: i32) -> Result<(), AppError> {
        self.write()
            .experience_details
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Experience detail", id))
    }
}
