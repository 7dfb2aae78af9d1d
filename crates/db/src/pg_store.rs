//! PostgreSQL content store.
//!
//! Every mutation runs in one transaction: the row is loaded with
//! `SELECT ... FOR UPDATE`, the shared mutation rule is applied in memory
//! and the full row, history included, is written back before commit. A
//! rejected mutation drops the transaction, which rolls it back.

use async_trait::async_trait;
use chrono::Utc;

use showcase_core::error::CoreError;
use showcase_core::featured::FeaturedGate;
use showcase_core::history;
use showcase_core::media::MediaAsset;
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

use crate::error::from_sqlx;
use crate::repositories::{PageHeaderRepo, ProjectRepo, TeamMemberRepo};
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgContentStore {
    pool: DbPool,
}

impl PgContentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn mutate_project<F>(&self, id: &str, apply: F) -> Result<ProjectRecord, CoreError>
    where
        F: FnOnce(&mut ProjectRecord) -> Result<(), CoreError> + Send,
    {
        let db = |e: sqlx::Error| from_sqlx(ENTITY, e);
        let mut tx = self.pool.begin().await.map_err(db)?;
        let row = ProjectRepo::find_for_update(&mut *tx, id)
            .await
            .map_err(db)?
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
        let mut record = ProjectRecord::try_from(row)?;
        apply(&mut record)?;
        ProjectRepo::update(&mut *tx, &record).await.map_err(db)?;
        tx.commit().await.map_err(db)?;
        Ok(record)
    }

    async fn mutate_team_member<F>(&self, id: &str, apply: F) -> Result<TeamMemberRecord, CoreError>
    where
        F: FnOnce(&mut TeamMemberRecord) -> Result<(), CoreError> + Send,
    {
        let db = |e: sqlx::Error| from_sqlx(TEAM_ENTITY, e);
        let mut tx = self.pool.begin().await.map_err(db)?;
        let row = TeamMemberRepo::find_for_update(&mut *tx, id)
            .await
            .map_err(db)?
            .ok_or_else(|| CoreError::not_found(TEAM_ENTITY, id))?;
        let mut record = TeamMemberRecord::from(row);
        apply(&mut record)?;
        TeamMemberRepo::update(&mut *tx, &record).await.map_err(db)?;
        tx.commit().await.map_err(db)?;
        Ok(record)
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| from_sqlx("Database", e))
    }

    async fn create(
        &self,
        input: NewProject,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        let record = new_record(input, actor, gate, Utc::now())?;
        let mut conn = self.pool.acquire().await.map_err(|e| from_sqlx(ENTITY, e))?;
        let row = ProjectRepo::insert(&mut *conn, &record)
            .await
            .map_err(|e| from_sqlx(ENTITY, e))?;
        ProjectRecord::try_from(row)
    }

    async fn get(&self, id: &str) -> Result<ProjectRecord, CoreError> {
        ProjectRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| from_sqlx(ENTITY, e))?
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?
            .try_into()
    }

    async fn list(&self, query: &ProjectQuery) -> Result<Page<ProjectRecord>, CoreError> {
        let (rows, total) = ProjectRepo::list(&self.pool, query)
            .await
            .map_err(|e| from_sqlx(ENTITY, e))?;
        let items = rows
            .into_iter()
            .map(ProjectRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            total,
            limit: query.pagination.limit,
            offset: query.pagination.offset,
        })
    }

    async fn replace(
        &self,
        id: &str,
        fields: ProjectFields,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        let record = self
            .mutate_project(id, |r| apply_replace(r, fields, actor, gate, Utc::now()))
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
            .mutate_project(id, |r| apply_merge(r, patch, actor, gate, Utc::now()))
            .await?;
        Ok(record)
    }

    async fn soft_delete(&self, id: &str, actor: &str) -> Result<ProjectRecord, CoreError> {
        self.mutate_project(id, |r| {
            history::soft_delete(r, actor, Utc::now());
            Ok(())
        })
        .await
    }

    async fn restore(
        &self,
        id: &str,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        self.mutate_project(id, |r| {
            apply_restore(r, actor, gate, Utc::now());
            Ok(())
        })
        .await
    }

    async fn reorder(
        &self,
        id: &str,
        order: i32,
        actor: &str,
        gate: &FeaturedGate,
    ) -> Result<ProjectRecord, CoreError> {
        self.mutate_project(id, |r| apply_reorder(r, order, actor, gate, Utc::now()))
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
            .mutate_project(id, |r| apply_attach(r, slot, asset, actor, gate, Utc::now()))
            .await?;
        Ok(record)
    }
}

#[async_trait]
impl SiteContentStore for PgContentStore {
    async fn create_team_member(
        &self,
        input: NewTeamMember,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError> {
        let record = site::new_team_member(input, actor, Utc::now())?;
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| from_sqlx(TEAM_ENTITY, e))?;
        let row = TeamMemberRepo::insert(&mut *conn, &record)
            .await
            .map_err(|e| from_sqlx(TEAM_ENTITY, e))?;
        Ok(row.into())
    }

    async fn get_team_member(&self, id: &str) -> Result<TeamMemberRecord, CoreError> {
        TeamMemberRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| from_sqlx(TEAM_ENTITY, e))?
            .map(TeamMemberRecord::from)
            .ok_or_else(|| CoreError::not_found(TEAM_ENTITY, id))
    }

    async fn list_team(&self, include_deleted: bool) -> Result<Vec<TeamMemberRecord>, CoreError> {
        let rows = TeamMemberRepo::list(&self.pool, include_deleted)
            .await
            .map_err(|e| from_sqlx(TEAM_ENTITY, e))?;
        Ok(rows.into_iter().map(TeamMemberRecord::from).collect())
    }

    async fn replace_team_member(
        &self,
        id: &str,
        fields: TeamMemberFields,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError> {
        self.mutate_team_member(id, |m| {
            site::apply_team_replace(m, fields, actor, Utc::now())
        })
        .await
    }

    async fn soft_delete_team_member(
        &self,
        id: &str,
        actor: &str,
    ) -> Result<TeamMemberRecord, CoreError> {
        self.mutate_team_member(id, |m| {
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
        self.mutate_team_member(id, |m| {
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
        self.mutate_team_member(id, |m| site::apply_team_photo(m, photo, actor, Utc::now()))
            .await
    }

    async fn get_header(&self, page: &str) -> Result<PageHeaderRecord, CoreError> {
        PageHeaderRepo::find_by_page(&self.pool, page)
            .await
            .map_err(|e| from_sqlx(HEADER_ENTITY, e))?
            .map(PageHeaderRecord::from)
            .ok_or_else(|| CoreError::not_found(HEADER_ENTITY, page))
    }

    async fn list_headers(&self) -> Result<Vec<PageHeaderRecord>, CoreError> {
        let rows = PageHeaderRepo::list(&self.pool)
            .await
            .map_err(|e| from_sqlx(HEADER_ENTITY, e))?;
        Ok(rows.into_iter().map(PageHeaderRecord::from).collect())
    }

    async fn upsert_header(
        &self,
        page: &str,
        fields: PageHeaderFields,
        actor: &str,
    ) -> Result<PageHeaderRecord, CoreError> {
        let db = |e: sqlx::Error| from_sqlx(HEADER_ENTITY, e);
        let mut tx = self.pool.begin().await.map_err(db)?;
        let existing = PageHeaderRepo::find_for_update(&mut *tx, page)
            .await
            .map_err(db)?
            .map(PageHeaderRecord::from);
        let record = site::upsert_header(existing, page, fields, actor, Utc::now())?;
        PageHeaderRepo::upsert(&mut *tx, &record).await.map_err(db)?;
        tx.commit().await.map_err(db)?;
        Ok(record)
    }

    async fn attach_header_hero(
        &self,
        page: &str,
        hero: MediaAsset,
        actor: &str,
    ) -> Result<PageHeaderRecord, CoreError> {
        let db = |e: sqlx::Error| from_sqlx(HEADER_ENTITY, e);
        let mut tx = self.pool.begin().await.map_err(db)?;
        let mut record = PageHeaderRepo::find_for_update(&mut *tx, page)
            .await
            .map_err(db)?
            .map(PageHeaderRecord::from)
            .ok_or_else(|| CoreError::not_found(HEADER_ENTITY, page))?;
        site::apply_header_hero(&mut record, hero, actor, Utc::now())?;
        PageHeaderRepo::upsert(&mut *tx, &record).await.map_err(db)?;
        tx.commit().await.map_err(db)?;
        Ok(record)
    }
}
