use async_trait::async_trait;

use crate::{
    entities::message::{Message, MessageInsert},
    errors::AppError,
    repositories::{memory::MemoryStore, not_found, sqlx_repo::{store_error, SqlxRepo}},
    schema::MESSAGES,
};

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create_message(&self, msg: &MessageInsert) -> Result<Message, AppError>;
    async fn get_message(&self, id: i32) -> Result<Message, AppError>;
    /// Newest first.
    async fn list_messages(&self) -> Result<Vec<Message>, AppError>;
    async fn delete_message(&self, id: i32) -> Result<(), AppError>;
}

#[async_trait]
impl MessageRepository for SqlxRepo {
    async fn create_message(&self, msg: &MessageInsert) -> Result<Message, AppError> {
        let sql = MESSAGES.insert_statement(&["name", "email", "subject", "message", "created_at"]);
        let message = sqlx::query_as::<_, Message>(&sql)
            .bind(&msg.name)
            .bind(&msg.email)
            .bind(&msg.subject)
            .bind(&msg.message)
            .bind(msg.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        tracing::debug!(id = message.id, "Stored contact message");
        Ok(message)
    }

    async fn get_message(&self, id: i32) -> Result<Message, AppError> {
        let sql = format!("SELECT {} FROM messages WHERE id = $1", MESSAGES.select_list());
        sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Message", id))
    }

    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        let sql = format!(
            "SELECT {} FROM messages ORDER BY created_at DESC, id DESC",
            MESSAGES.select_list()
        );
        let messages = sqlx::query_as::<_, Message>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(messages)
    }

    async fn delete_message(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Message", id));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create_message(&self, msg: &MessageInsert) -> Result<Message, AppError> {
        let mut tables = self.write();
        let id = tables.next_id(&MESSAGES);
        let message = msg.clone().persist(id);
        tables.messages.insert(id, message.clone());
        Ok(message)
    }

    async fn get_message(&self, id: i32) -> Result<Message, AppError> {
        self.read()
            .messages
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Message", id))
    }

    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        let mut messages: Vec<Message> = self.read().messages.values().cloned().collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(messages)
    }

    async fn delete_message(&self, id: i32) -> Result<(), AppError> {
        self.write()
            .messages
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Message", id))
    }
}
