use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{PgConnection, PgExecutor};

use crate::{
    entities::{
        project::{Project, ProjectInsert},
        project_tag::{NewProjectTag, ProjectTag},
        tag::Tag,
    },
    errors::AppError,
    repositories::{
        memory::{rejected, sort_newest_first, MemoryStore},
        not_found,
        sqlx_repo::{store_error, SqlxRepo},
    },
    schema::{PROJECTS, PROJECT_TAGS, TAGS},
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    /// Creates the project and its initial tag set; on any failure neither is stored.
    async fn create_project_with_tags(
        &self,
        project: &ProjectInsert,
        tag_ids: &[i32],
    ) -> Result<(Project, Vec<Tag>), AppError>;
    async fn get_project(&self, id: i32) -> Result<Project, AppError>;
    /// Newest first.
    async fn list_projects(&self, featured_only: bool) -> Result<Vec<Project>, AppError>;
    /// Drops the project's tag associations, then deletes it.
    async fn delete_project(&self, id: i32) -> Result<(), AppError>;

    async fn attach_tag(&self, link: &NewProjectTag) -> Result<ProjectTag, AppError>;
    async fn detach_tag(&self, project_id: i32, tag_id: i32) -> Result<(), AppError>;
    /// Replaces the project's whole tag set and returns the new set.
    async fn set_project_tags(&self, project_id: i32, tag_ids: &[i32]) -> Result<Vec<Tag>, AppError>;
    /// Tags of a project, by tag id.
    async fn tags_for_project(&self, project_id: i32) -> Result<Vec<Tag>, AppError>;
    /// Projects carrying a tag, newest first.
    async fn projects_for_tag(&self, tag_id: i32) -> Result<Vec<Project>, AppError>;
}

const PROJECT_COLUMNS: &[&str] = &[
    "title",
    "description",
    "image",
    "github",
    "live_url",
    "featured",
    "created_at",
];

async fn insert_project<'e>(
    executor: impl PgExecutor<'e>,
    project: &ProjectInsert,
) -> Result<Project, AppError> {
    let sql = PROJECTS.insert_statement(PROJECT_COLUMNS);
    let project = sqlx::query_as::<_, Project>(&sql)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image)
        .bind(&project.github)
        .bind(&project.live_url)
        .bind(project.featured)
        .bind(project.created_at)
        .fetch_one(executor)
        .await
        .map_err(store_error)?;

    tracing::debug!(id = project.id, "Created project {}", project.title);
    Ok(project)
}

async fn insert_links(
    conn: &mut PgConnection,
    project_id: i32,
    tag_ids: &BTreeSet<i32>,
) -> Result<(), AppError> {
    for tag_id in tag_ids {
        sqlx::query("INSERT INTO project_tags (project_id, tag_id) VALUES ($1, $2)")
            .bind(project_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await
            .map_err(store_error)?;
    }
    Ok(())
}

async fn select_tags<'e>(executor: impl PgExecutor<'e>, project_id: i32) -> Result<Vec<Tag>, AppError> {
    let sql = format!(
        r#"SELECT {}
        FROM tags
        WHERE id IN (SELECT tag_id FROM project_tags WHERE project_id = $1)
        ORDER BY id"#,
        TAGS.select_list()
    );
    let tags = sqlx::query_as::<_, Tag>(&sql)
        .bind(project_id)
        .fetch_all(executor)
        .await?;

    Ok(tags)
}

#[async_trait]
impl ProjectRepository for SqlxRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        insert_project(&self.pool, project).await
    }

    async fn create_project_with_tags(
        &self,
        project: &ProjectInsert,
        tag_ids: &[i32],
    ) -> Result<(Project, Vec<Tag>), AppError> {
        let tag_ids: BTreeSet<i32> = tag_ids.iter().copied().collect();
        let mut tx = self.pool.begin().await?;

        let project = insert_project(&mut *tx, project).await?;
        insert_links(&mut *tx, project.id, &tag_ids).await?;
        let tags = select_tags(&mut *tx, project.id).await?;

        tx.commit().await?;
        Ok((project, tags))
    }

    async fn get_project(&self, id: i32) -> Result<Project, AppError> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECTS.select_list());
        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Project", id))
    }

    async fn list_projects(&self, featured_only: bool) -> Result<Vec<Project>, AppError> {
        let sql = format!(
            r#"SELECT {}
            FROM projects
            WHERE $1 = FALSE OR COALESCE(featured, FALSE)
            ORDER BY created_at DESC, id DESC"#,
            PROJECTS.select_list()
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(featured_only)
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    async fn delete_project(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM project_tags WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Project", id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn attach_tag(&self, link: &NewProjectTag) -> Result<ProjectTag, AppError> {
        let sql = PROJECT_TAGS.insert_statement(&["project_id", "tag_id"]);
        let link = sqlx::query_as::<_, ProjectTag>(&sql)
            .bind(link.project_id)
            .bind(link.tag_id)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(link)
    }

    async fn detach_tag(&self, project_id: i32, tag_id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM project_tags WHERE project_id = $1 AND tag_id = $2")
            .bind(project_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Tag {tag_id} is not attached to project {project_id}"
            )));
        }
        Ok(())
    }

    async fn set_project_tags(&self, project_id: i32, tag_ids: &[i32]) -> Result<Vec<Tag>, AppError> {
        if !self.exists(&PROJECTS, project_id).await? {
            return Err(not_found("Project", project_id));
        }

        let tag_ids: BTreeSet<i32> = tag_ids.iter().copied().collect();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM project_tags WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        insert_links(&mut *tx, project_id, &tag_ids).await?;

        tx.commit().await?;
        tracing::debug!(project_id, tags = tag_ids.len(), "Replaced project tags");

        self.tags_for_project(project_id).await
    }

    async fn tags_for_project(&self, project_id: i32) -> Result<Vec<Tag>, AppError> {
        if !self.exists(&PROJECTS, project_id).await? {
            return Err(not_found("Project", project_id));
        }

        select_tags(&self.pool, project_id).await
    }

    async fn projects_for_tag(&self, tag_id: i32) -> Result<Vec<Project>, AppError> {
        if !self.exists(&TAGS, tag_id).await? {
            return Err(not_found("Tag", tag_id));
        }

        let sql = format!(
            r#"SELECT {}
            FROM projects
            WHERE id IN (SELECT project_id FROM project_tags WHERE tag_id = $1)
            ORDER BY created_at DESC, id DESC"#,
            PROJECTS.select_list()
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(tag_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let mut tables = self.write();
        let id = tables.next_id(&PROJECTS);
        let project = project.clone().persist(id);
        tables.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn create_project_with_tags(
        &self,
        project: &ProjectInsert,
        tag_ids: &[i32],
    ) -> Result<(Project, Vec<Tag>), AppError> {
        let mut tables = self.write();
        tables.check_tags(tag_ids).map_err(rejected)?;

        let id = tables.next_id(&PROJECTS);
        let project = project.clone().persist(id);
        tables.projects.insert(id, project.clone());
        for &tag_id in tag_ids {
            tables.project_tags.insert(ProjectTag { project_id: id, tag_id });
        }
        Ok((project, tables.tags_of(id)))
    }

    async fn get_project(&self, id: i32) -> Result<Project, AppError> {
        self.read()
            .projects
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Project", id))
    }

    async fn list_projects(&self, featured_only: bool) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self
            .read()
            .projects
            .values()
            .filter(|p| !featured_only || p.featured)
            .cloned()
            .collect();
        sort_newest_first(&mut projects);
        Ok(projects)
    }

    async fn delete_project(&self, id: i32) -> Result<(), AppError> {
        let mut tables = self.write();
        if tables.projects.remove(&id).is_none() {
            return Err(not_found("Project", id));
        }
        tables.unlink_project(id);
        Ok(())
    }

    async fn attach_tag(&self, link: &NewProjectTag) -> Result<ProjectTag, AppError> {
        let mut tables = self.write();
        if !tables.projects.contains_key(&link.project_id) {
            return Err(rejected(AppError::foreign_key(
                PROJECT_TAGS.name,
                format!("project {} does not exist", link.project_id),
            )));
        }
        if !tables.tags.contains_key(&link.tag_id) {
            return Err(rejected(AppError::foreign_key(
                PROJECT_TAGS.name,
                format!("tag {} does not exist", link.tag_id),
            )));
        }

        let link = link.persist();
        if !tables.project_tags.insert(link) {
            return Err(rejected(AppError::unique(
                PROJECT_TAGS.name,
                format!("tag {} is already attached to project {}", link.tag_id, link.project_id),
            )));
        }
        Ok(link)
    }

    async fn detach_tag(&self, project_id: i32, tag_id: i32) -> Result<(), AppError> {
        if self.write().project_tags.remove(&ProjectTag { project_id, tag_id }) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Tag {tag_id} is not attached to project {project_id}"
            )))
        }
    }

    async fn set_project_tags(&self, project_id: i32, tag_ids: &[i32]) -> Result<Vec<Tag>, AppError> {
        let mut tables = self.write();
        if !tables.projects.contains_key(&project_id) {
            return Err(not_found("Project", project_id));
        }
        tables.check_tags(tag_ids).map_err(rejected)?;

        tables.unlink_project(project_id);
        for &tag_id in tag_ids {
            tables.project_tags.insert(ProjectTag { project_id, tag_id });
        }
        Ok(tables.tags_of(project_id))
    }

    async fn tags_for_project(&self, project_id: i32) -> Result<Vec<Tag>, AppError> {
        let tables = self.read();
        if !tables.projects.contains_key(&project_id) {
            return Err(not_found("Project", project_id));
        }
        Ok(tables.tags_of(project_id))
    }

    async fn projects_for_tag(&self, tag_id: i32) -> Result<Vec<Project>, AppError> {
        let tables = self.read();
        if !tables.tags.contains_key(&tag_id) {
            return Err(not_found("Tag", tag_id));
        }
        Ok(tables.projects_of(tag_id))
    }
}
