//! Per-request upload flow: parse, validate, publish, attach.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use futures::Stream;
use serde::Serialize;

use showcase_core::featured::FeaturedGate;
use showcase_core::image_probe::probe_dimensions;
use showcase_core::media::{normalize_mime, MediaAsset, MediaKind, UploadCategory};
use showcase_core::project::ProjectRecord;
use showcase_core::site::{PageHeaderRecord, TeamMemberRecord};
use showcase_core::store::{AttachTarget, ContentBackend};
use showcase_core::upload_validation::{check_type, parse_category, validate, UploadRejection};
use showcase_media::{PublishRequest, PublishSource, Publisher};

use crate::error::{UploadError, UploadFailure};
use crate::spool::{buffer_stream, spool_stream, Buffered, SpoolError, Spooled};
use crate::state::{StateTrail, UploadState};

/// Text fields of an upload form. All optional here so that missing ones
/// are reported by the pipeline itself.
#[derive(Debug, Clone, Default)]
pub struct UploadFields {
    pub category: Option<String>,
    /// `project`, `team` or `header`.
    pub target: Option<String>,
    pub target_id: Option<String>,
    pub slot: Option<String>,
    /// Delivery format hint.
    pub format: Option<String>,
    pub alt_text: BTreeMap<String, String>,
}

/// The file part of an upload form.
pub struct UploadFile<S> {
    /// Declared content type of the part.
    pub content_type: Option<String>,
    pub body: S,
}

/// The record an asset was attached to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum AttachedRecord {
    Project(ProjectRecord),
    TeamMember(TeamMemberRecord),
    PageHeader(PageHeaderRecord),
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub state: UploadState,
    pub asset: MediaAsset,
    pub attached: AttachedRecord,
    pub trail: StateTrail,
}

/// Upload body after parsing.
enum Body {
    Buffered(Buffered),
    Spooled(Spooled),
}

impl Body {
    fn len(&self) -> u64 {
        match self {
            Self::Buffered(b) => b.bytes.len() as u64,
            Self::Spooled(s) => s.len(),
        }
    }
}

struct Parsed {
    category: UploadCategory,
    target: AttachTarget,
    mime: String,
    body: Body,
}

pub struct UploadOrchestrator {
    content: Arc<dyn ContentBackend>,
    publisher: Arc<Publisher>,
    gate: FeaturedGate,
    spool_dir: PathBuf,
}

impl UploadOrchestrator {
    pub fn new(
        content: Arc<dyn ContentBackend>,
        publisher: Arc<Publisher>,
        gate: FeaturedGate,
        spool_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            content,
            publisher,
            gate,
            spool_dir: spool_dir.into(),
        }
    }

    /// Run one upload to completion. Every failure is terminal.
    pub async fn run<S, B, E>(
        &self,
        fields: UploadFields,
        file: Option<UploadFile<S>>,
        actor: &str,
    ) -> Result<UploadOutcome, UploadError>
    where
        S: Stream<Item = Result<B, E>> + Send,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        let mut trail = StateTrail::new();
        let format = fields.format.clone();
        let alt_text = fields.alt_text.clone();

        trail.advance(UploadState::Parsing);
        let parsed = match self.parse(fields, file).await {
            Ok(parsed) => parsed,
            Err(failure) => return Err(fail(trail, failure)),
        };

        tracing::info!(
            actor,
            category = %parsed.category,
            target = %parsed.target,
            bytes = parsed.body.len(),
            "Upload received"
        );

        trail.advance(UploadState::Validating);
        if let Err(rejection) = check(&parsed) {
            return Err(fail(trail, rejection.into()));
        }

        trail.advance(UploadState::Publishing);
        let request = PublishRequest {
            category: parsed.category,
            source_mime: parsed.mime.clone(),
            target_format: format,
            hint: parsed.target.hint().to_string(),
            alt_text,
        };
        // The spool file lives until the store has the bytes.
        let (source, spooled) = match parsed.body {
            Body::Buffered(buffered) => (PublishSource::Bytes(buffered.bytes), None),
            Body::Spooled(spooled) => (spooled.source(), Some(spooled)),
        };
        let published = self.publisher.publish(source, request).await;
        drop(spooled);
        let asset = match published {
            Ok(asset) => asset,
            Err(err) => return Err(fail(trail, err.into())),
        };

        trail.advance(UploadState::Attaching);
        let attached = match self.attach(&parsed.target, asset.clone(), actor).await {
            Ok(attached) => attached,
            Err(err) => return Err(fail(trail, err.into())),
        };

        trail.advance(UploadState::Succeeded);
        tracing::info!(
            actor,
            target = %parsed.target,
            asset_id = %asset.asset_id,
            url = %asset.url,
            "Upload attached"
        );

        Ok(UploadOutcome {
            state: trail.current(),
            asset,
            attached,
            trail,
        })
    }

    async fn parse<S, B, E>(
        &self,
        fields: UploadFields,
        file: Option<UploadFile<S>>,
    ) -> Result<Parsed, UploadFailure>
    where
        S: Stream<Item = Result<B, E>> + Send,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        let category = parse_category(&required(fields.category, "category")?)?;
        let target_kind = required(fields.target, "target")?;
        let target_id = required(fields.target_id, "target_id")?;
        let target =
            AttachTarget::parse(&target_kind, &target_id, fields.slot.as_deref(), category)?;
        if !target.accepts(category) {
            return Err(UploadRejection::TargetMismatch {
                category: category.name().into(),
                target: target.to_string(),
            }
            .into());
        }

        let file = file.ok_or_else(|| UploadFailure::Malformed("missing file part".into()))?;
        let mime = normalize_mime(&required(file.content_type, "file content type")?);
        check_type(category, &mime)?;
        let stream = file.body;

        let max_bytes = category.requirement().max_bytes;
        let body = match category.media_kind() {
            MediaKind::Image => buffer_stream(stream, max_bytes).await.map(Body::Buffered),
            MediaKind::Video => spool_stream(stream, max_bytes, &self.spool_dir)
                .await
                .map(Body::Spooled),
        }
        .map_err(spool_failure)?;

        Ok(Parsed {
            category,
            target,
            mime,
            body,
        })
    }

    async fn attach(
        &self,
        target: &AttachTarget,
        asset: MediaAsset,
        actor: &str,
    ) -> Result<AttachedRecord, showcase_core::error::CoreError> {
        match target {
            AttachTarget::Project { id, slot } => self
                .content
                .attach_media(id, *slot, asset, actor, &self.gate)
                .await
                .map(AttachedRecord::Project),
            AttachTarget::TeamMember { id } => self
                .content
                .attach_team_photo(id, asset, actor)
                .await
                .map(AttachedRecord::TeamMember),
            AttachTarget::PageHeader { page } => self
                .content
                .attach_header_hero(page, asset, actor)
                .await
                .map(AttachedRecord::PageHeader),
        }
    }
}

/// Probe the real content and run the requirement rules. The declared type
/// is checked before sniffing so a refused type is reported as such.
fn check(parsed: &Parsed) -> Result<(), UploadRejection> {
    check_type(parsed.category, &parsed.mime)?;
    let dimensions = match &parsed.body {
        Body::Buffered(buffered) => {
            probe_dimensions(&buffered.bytes, &parsed.mime, parsed.category)?
        }
        Body::Spooled(_) => None,
    };
    validate(parsed.category, &parsed.mime, parsed.body.len(), dimensions)
}

fn required(value: Option<String>, field: &str) -> Result<String, UploadFailure> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| UploadFailure::Malformed(format!("missing field '{field}'")))
}

fn spool_failure(err: SpoolError) -> UploadFailure {
    match err {
        SpoolError::TooLarge {
            max_bytes,
            received_bytes,
        } => UploadRejection::TooLarge {
            max_bytes,
            actual_bytes: received_bytes,
        }
        .into(),
        SpoolError::Read(msg) => UploadFailure::Malformed(msg),
        SpoolError::Io(err) => UploadFailure::Spool(err),
    }
}

fn fail(mut trail: StateTrail, failure: UploadFailure) -> UploadError {
    let stage = trail.current();
    let state = trail.reject();
    tracing::warn!(
        stage = %stage,
        state = %state,
        reason = failure.code(),
        error = %failure,
        "Upload rejected"
    );
    UploadError {
        state,
        stage,
        failure,
        trail,
    }
}
