//! Persistence for the portfolio tables.
//!
//! Each aggregate has its own repository trait. Two backends implement all of
//! them: [`sqlx_repo::SqlxRepo`] for Postgres and [`memory::MemoryStore`], an
//! in-process store that enforces the same unique, foreign-key and composite
//! key rules as the DDL. Related collections are only ever loaded by an
//! explicit call such as [`project::ProjectRepository::tags_for_project`].

pub mod experience;
pub mod memory;
pub mod message;
pub mod project;
pub mod skill;
pub mod sqlx_repo;
pub mod tag;
pub mod user;

use crate::errors::AppError;

use experience::ExperienceRepository;
use message::MessageRepository;
use project::ProjectRepository;
use skill::SkillRepository;
use tag::TagRepository;
use user::UserRepository;

/// A backend implementing every repository.
pub trait PortfolioStore:
    MessageRepository
    + UserRepository
    + TagRepository
    + ProjectRepository
    + SkillRepository
    + ExperienceRepository
    + Clone
    + 'static
{
}

impl<T> PortfolioStore for T where
    T: MessageRepository
        + UserRepository
        + TagRepository
        + ProjectRepository
        + SkillRepository
        + ExperienceRepository
        + Clone
        + 'static
{
}

pub(crate) fn not_found(entity: &str, id: i32) -> AppError {
    AppError::NotFound(format!("{entity} with id {id}"))
}
