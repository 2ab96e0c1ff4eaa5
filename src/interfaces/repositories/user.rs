use async_trait::async_trait;

use crate::{
    entities::user::{NewUser, User},
    errors::AppError,
    repositories::{memory::{rejected, MemoryStore}, not_found, sqlx_repo::{store_error, SqlxRepo}},
    schema::USERS,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `user.password` must already be hashed.
    async fn create_user(&self, user: &NewUser) -> Result<User, AppError>;
    async fn get_user(&self, id: i32) -> Result<User, AppError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn delete_user(&self, id: i32) -> Result<(), AppError>;
}

#[async_trait]
impl UserRepository for SqlxRepo {
    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let sql = USERS.insert_statement(&["username", "password"]);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.password)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        tracing::info!(id = user.id, "Created user {}", user.username);
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> Result<User, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USERS.select_list());
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("User", id))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USERS.select_list());
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn delete_user(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("User", id));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let mut tables = self.write();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(rejected(AppError::unique(
                USERS.name,
                format!("username '{}' already exists", user.username),
            )));
        }

        let id = tables.next_id(&USERS);
        let user = user.clone().persist(id);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> Result<User, AppError> {
        self.read()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("User", id))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn delete_user(&self, id: i32) -> Result<(), AppError> {
        self.write()
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("User", id))
    }
}
