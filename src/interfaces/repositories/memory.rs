use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    entities::{
        experience::{Experience, ExperienceDetail},
        message::Message,
        project::Project,
        project_tag::ProjectTag,
        skill::Skill,
        tag::Tag,
        user::User,
    },
    errors::AppError,
    schema::{Table, PROJECT_TAGS},
};

/// In-process backend for every repository trait.
///
/// Rows live behind a single lock, so each repository call is atomic. The
/// store enforces the same rules as the Postgres DDL: unique columns, foreign
/// keys, the composite key on `project_tags`, and identities drawn from a
/// per-table sequence that never hands out a value twice.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub messages: BTreeMap<i32, Message>,
    pub users: BTreeMap<i32, User>,
    pub projects: BTreeMap<i32, Project>,
    pub tags: BTreeMap<i32, Tag>,
    pub project_tags: BTreeSet<ProjectTag>,
    pub skills: BTreeMap<i32, Skill>,
    pub experiences: BTreeMap<i32, Experience>,
    pub experience_details: BTreeMap<i32, ExperienceDetail>,
    sequences: HashMap<&'static str, i32>,
}

impl Tables {
    /// Next identity for `table`. Call only once every constraint has passed.
    pub fn next_id(&mut self, table: &Table) -> i32 {
        let seq = self.sequences.entry(table.name).or_insert(0);
        *seq += 1;
        *seq
    }

    pub fn tags_of(&self, project_id: i32) -> Vec<Tag> {
        self.project_tags
            .range(ProjectTag { project_id, tag_id: i32::MIN }..=ProjectTag { project_id, tag_id: i32::MAX })
            .filter_map(|pt| self.tags.get(&pt.tag_id).cloned())
            .collect()
    }

    pub fn projects_of(&self, tag_id: i32) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .project_tags
            .iter()
            .filter(|pt| pt.tag_id == tag_id)
            .filter_map(|pt| self.projects.get(&pt.project_id).cloned())
            .collect();
        sort_newest_first(&mut projects);
        projects
    }

    pub fn details_of(&self, experience_id: i32) -> Vec<ExperienceDetail> {
        let mut details: Vec<ExperienceDetail> = self
            .experience_details
            .values()
            .filter(|d| d.experience_id == experience_id)
            .cloned()
            .collect();
        details.sort_by_key(|d| (d.order, d.id));
        details
    }

    /// Foreign-key check for a batch of tag links.
    pub fn check_tags(&self, tag_ids: &[i32]) -> Result<(), AppError> {
        match tag_ids.iter().find(|id| !self.tags.contains_key(*id)) {
            Some(missing) => Err(AppError::foreign_key(
                PROJECT_TAGS.name,
                format!("tag {missing} does not exist"),
            )),
            None => Ok(()),
        }
    }

    pub fn unlink_project(&mut self, project_id: i32) {
        self.project_tags.retain(|pt| pt.project_id != project_id);
    }

    pub fn unlink_tag(&mut self, tag_id: i32) {
        self.project_tags.retain(|pt| pt.tag_id != tag_id);
    }
}

pub(crate) fn sort_newest_first(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// Logs and returns a constraint rejection.
pub(crate) fn rejected(err: AppError) -> AppError {
    if let AppError::ConstraintViolation(violation) = &err {
        tracing::warn!("Write rejected: {}", violation);
    }
    err
}
