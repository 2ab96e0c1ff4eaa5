use async_trait::async_trait;

use crate::{
    entities::tag::{Tag, TagInsert},
    errors::AppError,
    repositories::{memory::{rejected, MemoryStore}, not_found, sqlx_repo::{store_error, SqlxRepo}},
    schema::TAGS,
};

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create_tag(&self, tag: &TagInsert) -> Result<Tag, AppError>;
    async fn get_tag(&self, id: i32) -> Result<Tag, AppError>;
    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, AppError>;
    /// Alphabetical by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, AppError>;
    /// Removes the tag from every project, then deletes it.
    async fn delete_tag(&self, id: i32) -> Result<(), AppError>;
}

#[async_trait]
impl TagRepository for SqlxRepo {
    async fn create_tag(&self, tag: &TagInsert) -> Result<Tag, AppError> {
        let sql = TAGS.insert_statement(&["name", "color"]);
        let tag = sqlx::query_as::<_, Tag>(&sql)
            .bind(&tag.name)
            .bind(&tag.color)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        tracing::debug!(id = tag.id, "Created tag {}", tag.name);
        Ok(tag)
    }

    async fn get_tag(&self, id: i32) -> Result<Tag, AppError> {
        let sql = format!("SELECT {} FROM tags WHERE id = $1", TAGS.select_list());
        sqlx::query_as::<_, Tag>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Tag", id))
    }

    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, AppError> {
        let sql = format!("SELECT {} FROM tags WHERE name = $1", TAGS.select_list());
        let tag = sqlx::query_as::<_, Tag>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tag)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let sql = format!("SELECT {} FROM tags ORDER BY name, id", TAGS.select_list());
        let tags = sqlx::query_as::<_, Tag>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(tags)
    }

    async fn delete_tag(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM project_tags WHERE tag_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Tag", id));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn create_tag(&self, tag: &TagInsert) -> Result<Tag, AppError> {
        let mut tables = self.write();
        if tables.tags.values().any(|t| t.name == tag.name) {
            return Err(rejected(AppError::unique(
                TAGS.name,
                format!("tag '{}' already exists", tag.name),
            )));
        }

        let id = tables.next_id(&TAGS);
        let tag = tag.clone().persist(id);
        tables.tags.insert(id, tag.clone());
        Ok(tag)
    }

    async fn get_tag(&self, id: i32) -> Result<Tag, AppError> {
        self.read()
            .tags
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Tag", id))
    }

    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, AppError> {
        Ok(self.read().tags.values().find(|t| t.name == name).cloned())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let mut tags: Vec<Tag> = self.read().tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(tags)
    }

    async fn delete_tag(&self, id: i32) -> Result<(), AppError> {
        let mut tables = self.write();
        if tables.tags.remove(&id).is_none() {
            return Err(not_found("Tag", id));
        }
        tables.unlink_tag(id);
        Ok(())
    }
}
