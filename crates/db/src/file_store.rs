//! File-backed content store.
//!
//! Each collection (projects, team, headers) lives in one JSON array
//! document under the store root. Every mutation reads the whole document,
//! applies the change in memory and replaces the file through
//! [`write_atomic`]. There is no lock around the read-modify-write cycle:
//! two writers racing on the same collection resolve last-writer-wins, and
//! the loser's change is dropped while the document itself stays intact.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use showcase_core::error::CoreError;
use showcase_core::featured::FeaturedGate;
use showcase_core::history;
use showcase_core::media::MediaAsset;
use showcase_core::project::listing::select;
use showcase_core::project::mutation::{
    apply_attach, apply_merge, apply_reorder, apply_replace, apply_restore, new_record, ENTITY,
};
use showcase_core::project::{
    MediaSlot, NewProject, Page, ProjectFields, ProjectPatch, ProjectQuery, ProjectRecord,
};
use showcase_core::site::{
    self, NewTeamMember, PageHeaderFields, PageHeaderRecord, TeamMemberFields, TeamMemberRecord,
    HEADER_ENTITY, TEAM_ENTITY,
};
use showcase_core::store::{ContentStore, SiteContentStore};

use crate::atomic::write_atomic;
use crate::error::{from_io, from_json};

pub const PROJECTS_FILE: &str = "projects.json";
pub const TEAM_FILE: &str = "team.json";
pub const HEADERS_FILE: &str = "headers.json";

/// Records addressable by their string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for ProjectRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for TeamMemberRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for PageHeaderRecord {
    fn key(&self) -> &str {
        &self.page
    }
}

/// One collection document on disk.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned + Send + 'static,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole collection. A missing file is an empty collection.
    pub async fn load(&self) -> Result<Vec<T>, CoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(from_io("Failed to read collection", err)),
        };
        serde_json::from_slice(&bytes).map_err(|e| from_json("Corrupt collection document", e))
    }

    /// Replace the whole collection atomically.
    pub async fn save(&self, items: &[T]) -> Result<(), CoreError> {
        let bytes = serde_json::to_vec_pretty(items)
            .map_err(|e| from_json("Failed to encode collection", e))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| CoreError::Internal(format!("Write task failed: {e}")))?
            .map_err(|e| from_io("Failed to write collection", e))
    }

    /// Read, change and write back. Nothing is written when `apply` fails.
    pub async fn mutate<R, F>(&self, apply: F) -> Result<R, CoreError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, CoreError> + Send,
        R: Send,
    {
        let mut items = self.load().await?;
        let result = apply(&mut items)?;
        self.save(&items).await?;
        Ok(result)
    }

    pub async fn find(&self, entity: &'static str, key: &str) -> Result<T, CoreError> {
        self.load()
            .await?
            .into_iter()
            .find(|item| item.key() == key)
            .ok_or_else(|| CoreError::not_found(entity, key))
    }

    /// Apply `change` to the record with `key` and persist it.
    pub async fn update<F>(&self, entity: &'static str, key: &str, change: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut T) -> Result<(), CoreError> + Send,
    {
        self.mutate(|items| {
            let item = items
                .iter_mut()
                .find(|item| item.key() == key)
                .ok_or_else(|| CoreError::not_found(entity, key))?;
            change(item)?;
            Ok(item.clone())
        })
        .await
    }

    /// Append a new record, refusing duplicate keys (live or deleted).
    pub async fn insert(&self, entity: &'static str, record: T) -> Result<T, CoreError> {
        self.mutate(|items| {
            if items.iter().any(|item| item.key() == record.key()) {
                return Err(CoreError::Conflict(format!(
                    "{entity} '{}' already exists",
                    record.key()
                )));
            }
            items.push(record.clone());
            Ok(record)
        })
        .await
    }
}

/// Content store persisting to JSON documents under a root directory.
#[derive(Debug, Clone)]
pub struct FileContentStore {
    root: PathBuf,
    projects: Collection<ProjectRecord>,
    team: Collection<TeamMemberRecord>,
    headers: Collection<PageHeaderRecord>,
}

impl FileContentStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| from_io("Failed to create content directory", e))?;
        tracing::info!(root = %root.display(), "File content store opened");
        Ok(Self {
            projects: Collection::new(root.join(PROJECTS_FILE)),
            team: Collection::new(root.join(TEAM_FILE)),
            headers: Collection::new(root.join(HEADERS_FILE)),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn projects(&self) -> &Collection<ProjectRecord> {
        &self.projects
    }
}

#[async_trait]
impl ContentStore for FileContentStore {
    async fn ping(&self) -> Result<(), CoreError> {
        tokio::fs::metadata(&self.root)
            .await
            .map(|_| ())
            .map_err(|e| from_io("Content directory unavailable", e))
    }

    async fn create(
        &self,
        input: NewProject,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        let record = new_record(input, actor, gate, Utc::now())?;
        let record = self.projects.insert(ENTITY, record).await?;
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<ProjectRecord, CoreError> {
        self.projects.find(ENTITY, id).await
    }

    async fn list(&self, query: &ProjectQuery) -> Result<Page<ProjectRecord>, CoreError> {
        let items = self.projects.load().await?;
        Ok(select(&items, query))
    }

    async fn replace(
        &self,
        id: &str,
        fields: ProjectFields,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        let record = self
            .projects
            .update(ENTITY, id, |r| apply_replace(r, fields, actor, gate, Utc::now()))
            .await?;
        Ok(record)
    }

    async fn merge(
        &self,
        id: &str,
        patch: ProjectPatch,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        let record = self
            .projects
            .update(ENTITY, id, |r| apply_merge(r, patch, actor, gate, Utc::now()))
            .await?;
        Ok(record)
    }

    async fn soft_delete(&self, id: &str, actor: &str) -> Result<ProjectRecord, CoreError> {
        let record = self
            .projects
            .update(ENTITY, id, |r| {
                history::soft_delete(r, actor, Utc::now());
                Ok(())
            })
            .await?;
        Ok(record)
    }

    async fn restore(
        &self,
        id: &str,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        let record = self
            .projects
            .update(ENTITY, id, |r| {
                apply_restore(r, actor, gate, Utc::now());
                Ok(())
            })
            .await?;
        Ok(record)
    }

    async fn reorder(
        &self,
        id: &str,
        order: i32,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        self.projects
            .update(ENTITY, id, |r| apply_reorder(r, order, actor, gate, Utc::now()))
            .await
    }

    async fn attach_media(
        &self,
        id: &str,
        slot: MediaSlot,
        asset: MediaAsset,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        let record = self
            .projects
            .update(ENTITY, id, |r| {
                apply_attach(r, slot, asset, actor, gate, Utc::now())
            })
            .await?;
        Ok(record)
    }
}

#[async_trait]
impl SiteContentStore for FileContentStore {
    async fn create_team_member(
        &self,
        input: NewTeamMember,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError> {
        let record = site::new_team_member(input, actor, Utc::now())?;
        self.team.insert(TEAM_ENTITY, record).await
    }

    async fn get_team_member(&self, id: &str) -> Result<TeamMemberRecord, CoreError> {
        self.team.find(TEAM_ENTITY, id).await
    }

    async fn list_team(&self, include_deleted: bool) -> Result<Vec<TeamMemberRecord>, CoreError> {
        let mut members: Vec<_> = self
            .team
            .load()
            .await?
            .into_iter()
            .filter(|m| include_deleted || !m.deleted)
            .collect();
        site::sort_team(&mut members);
        Ok(members)
    }

    async fn replace_team_member(
        &self,
        id: &str,
        fields: TeamMemberFields,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError> {
        self.team
            .update(TEAM_ENTITY, id, |m| {
                site::apply_team_replace(m, fields, actor, Utc::now())
            })
            .await
    }

    async fn soft_delete_team_member(
        &self,
        id: &str,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError> {
        self.team
            .update(TEAM_ENTITY, id, |m| {
                history::soft_delete(m, actor, Utc::now());
                Ok(())
            })
            .await
    }

    async fn restore_team_member(
        &self,
        id: &str,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError> {
        self.team
            .update(TEAM_ENTITY, id, |m| {
                history::restore(m, actor, Utc::now());
                Ok(())
            })
            .await
    }

    async fn attach_team_photo(
        &self,
        id: &str,
        photo: MediaAsset,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError> {
        self.team
            .update(TEAM_ENTITY, id, |m| {
                site::apply_team_photo(m, photo, actor, Utc::now())
            })
            .await
    }

    async fn get_header(&self, page: &str) -> Result<PageHeaderRecord, CoreError> {
        self.headers.find(HEADER_ENTITY, page).await
    }

    async fn list_headers(&self) -> Result<Vec<PageHeaderRecord>, CoreError> {
        let mut headers = self.headers.load().await?;
        headers.sort_by(|a, b| a.page.cmp(&b.page));
        Ok(headers)
    }

    async fn upsert_header(
        &self,
        page: &str,
        fields: PageHeaderFields,
        actor: &str,
    ) -> Result<PageHeaderRecord, CoreError> {
        self.headers
            .mutate(|items| {
                let position = items.iter().position(|h| h.page == page);
                let existing = position.map(|i| items[i].clone());
                let record = site::upsert_header(existing, page, fields, actor, Utc::now())?;
                match position {
                    Some(i) => items[i] = record.clone(),
                    None => items.push(record.clone()),
                }
                Ok(record)
            })
            .await
    }

    async fn attach_header_hero(
        &self,
        page: &str,
        hero: MediaAsset,
        actor: &str,
    ) -> Result<PageHeaderRecord, CoreError> {
        self.headers
            .update(HEADER_ENTITY, page, |h| {
                site::apply_header_hero(h, hero, actor, Utc::now())
            })
            .await
    }
}
