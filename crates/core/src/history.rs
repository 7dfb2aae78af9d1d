//! Append-only change history shared by every versioned record type.
//!
//! Entries are only ever pushed through [`record_change`]; nothing in the
//! codebase edits or removes an entry once appended.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{ActorId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Create,
    Put,
    Patch,
    SoftDelete,
    Restore,
    Reorder,
}

impl HistoryAction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::SoftDelete => "soft_delete",
            Self::Restore => "restore",
            Self::Reorder => "reorder",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "create" => Ok(Self::Create),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "soft_delete" => Ok(Self::SoftDelete),
            "restore" => Ok(Self::Restore),
            "reorder" => Ok(Self::Reorder),
            other => Err(CoreError::Internal(format!(
                "Unknown history action '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub at: Timestamp,
    pub by: ActorId,
    pub action: HistoryAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_snapshot: Option<serde_json::Value>,
}

/// A record carrying an append-only history and `updated_*` stamps.
pub trait Versioned {
    fn history(&self) -> &[HistoryEntry];
    fn history_mut(&mut self) -> &mut Vec<HistoryEntry>;
    fn touch(&mut self, at: Timestamp, actor: &str);
}

/// A versioned record that supports soft delete.
pub trait Archivable: Versioned {
    fn is_deleted(&self) -> bool;
    fn set_deleted(&mut self, deleted: bool);
}

/// Append one history entry, optionally stamping `updated_at`/`updated_by`.
pub fn record_change<V: Versioned + ?Sized>(
    record: &mut V,
    action: HistoryAction,
    actor: &str,
    at: Timestamp,
    snapshot: Option<serde_json::Value>,
    touch: bool,
) {
    if touch {
        record.touch(at, actor);
    }
    record.history_mut().push(HistoryEntry {
        at,
        by: actor.to_string(),
        action,
        payload_snapshot: snapshot,
    });
}

/// Mark a record deleted. Idempotent in visible state: a repeated call only
/// appends the entry recording the explicit request.
///
/// Returns `true` when the deleted flag actually changed.
pub fn soft_delete<A: Archivable + ?Sized>(record: &mut A, actor: &str, at: Timestamp) -> bool {
    let changed = !record.is_deleted();
    if changed {
        record.set_deleted(true);
    }
    record_change(record, HistoryAction::SoftDelete, actor, at, None, changed);
    changed
}

/// Bring a soft-deleted record back. Same idempotency as [`soft_delete`].
pub fn restore<A: Archivable + ?Sized>(record: &mut A, actor: &str, at: Timestamp) -> bool {
    let changed = record.is_deleted();
    if changed {
        record.set_deleted(false);
    }
    record_change(record, HistoryAction::Restore, actor, at, None, changed);
    changed
}

/// Refuse edits to a soft-deleted record.
pub fn ensure_active<A: Archivable + ?Sized>(
    record: &A,
    entity: &'static str,
    id: &str,
) -> Result<(), CoreError> {
    if record.is_deleted() {
        return Err(CoreError::Conflict(format!(
            "{entity} '{id}' is deleted; restore it before editing"
        )));
    }
    Ok(())
}
