use sqlx::PgPool;

use crate::{
    errors::AppError,
    schema::{Table, TABLES},
};

/// Postgres backend for every repository trait.
#[derive(Clone)]
pub struct SqlxRepo {
    pub pool: PgPool,
}

impl SqlxRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxRepo { pool }
    }

    pub async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    /// Creates any missing table. Existing tables are left untouched.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        for table in TABLES {
            let ddl = table.create_statement();
            sqlx::query(&ddl)
                .execute(&self.pool)
                .await
                .map_err(store_error)?;
            tracing::debug!(table = table.name, "Table ready");
        }
        tracing::info!("Schema initialized ({} tables)", TABLES.len());
        Ok(())
    }

    pub(crate) async fn exists(&self, table: &Table, id: i32) -> Result<bool, AppError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table.name);
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

/// Converts a write failure, logging constraint rejections.
pub(crate) fn store_error(err: sqlx::Error) -> AppError {
    let err = AppError::from(err);
    if let AppError::ConstraintViolation(violation) = &err {
        tracing::warn!("Write rejected: {}", violation);
    }
    err
}
