//! Shared fixtures for orchestrator tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use image::{DynamicImage, ImageFormat, RgbImage};
use tempfile::TempDir;

use showcase_core::featured::FeaturedGate;
use showcase_core::project::{
    NewProject, ProjectCategory, ProjectFields, ProjectMedia, ProjectStatus, ProjectText,
};
use showcase_core::site::{NewTeamMember, TeamMemberFields, TeamText};
use showcase_core::store::{ContentStore, SiteContentStore};
use showcase_db::FileContentStore;
use showcase_media::{MemoryMediaStore, Publisher};
use showcase_pipeline::{UploadError, UploadFields, UploadFile, UploadOrchestrator, UploadOutcome};

pub const MEDIA_BASE: &str = "https://media.test";

pub type Body = BoxStream<'static, Result<Vec<u8>, String>>;

pub struct Harness {
    pub content: Arc<FileContentStore>,
    pub media: Arc<MemoryMediaStore>,
    pub orchestrator: UploadOrchestrator,
    pub spool_dir: TempDir,
    _content_dir: TempDir,
}

pub fn gate() -> FeaturedGate {
    FeaturedGate::new([format!("{MEDIA_BASE}/")])
}

pub async fn harness() -> Harness {
    let content_dir = tempfile::tempdir().unwrap();
    let spool_dir = tempfile::tempdir().unwrap();
    let content = Arc::new(FileContentStore::open(content_dir.path()).await.unwrap());
    let media = Arc::new(MemoryMediaStore::new(MEDIA_BASE));
    let publisher = Arc::new(Publisher::new(media.clone(), "showcase"));
    let orchestrator =
        UploadOrchestrator::new(content.clone(), publisher, gate(), spool_dir.path());

    Harness {
        content,
        media,
        orchestrator,
        spool_dir,
        _content_dir: content_dir,
    }
}

impl Harness {
    /// Run an upload as actor `ana`.
    pub async fn upload(&self, upload: Upload) -> Result<UploadOutcome, UploadError> {
        self.orchestrator.run(upload.fields, upload.file, "ana").await
    }

    pub async fn seed_project(&self, id: &str) {
        let input = NewProject {
            id: id.to_string(),
            fields: ProjectFields {
                status: ProjectStatus::Published,
                featured: false,
                order: 0,
                category: ProjectCategory::Production,
                city: "Lyon".to_string(),
                client: None,
                i18n: BTreeMap::from([(
                    "en".to_string(),
                    ProjectText {
                        title: "Festival of Lights".to_string(),
                        excerpt: String::new(),
                        description: String::new(),
                    },
                )]),
                media: ProjectMedia::default(),
            },
        };
        self.content.create(input, "ana", &gate()).await.unwrap();
    }

    pub async fn seed_team_member(&self, id: &str) {
        let input = NewTeamMember {
            id: id.to_string(),
            fields: TeamMemberFields {
                name: "Léa Martin".to_string(),
                order: 0,
                i18n: BTreeMap::from([(
                    "en".to_string(),
                    TeamText {
                        role: "Producer".to_string(),
                        bio: String::new(),
                    },
                )]),
                photo: None,
            },
        };
        self.content.create_team_member(input, "ana").await.unwrap();
    }
}

/// Split `bytes` into 8 KiB chunks, like a multipart field would arrive.
pub fn body(bytes: Vec<u8>) -> Body {
    let chunks: Vec<Result<Vec<u8>, String>> =
        bytes.chunks(8 * 1024).map(|c| Ok(c.to_vec())).collect();
    stream::iter(chunks).boxed()
}

pub struct Upload {
    pub fields: UploadFields,
    pub file: Option<UploadFile<Body>>,
}

pub fn form(category: &str, target: &str, target_id: &str, mime: &str, bytes: Vec<u8>) -> Upload {
    Upload {
        fields: UploadFields {
            category: Some(category.to_string()),
            target: Some(target.to_string()),
            target_id: Some(target_id.to_string()),
            alt_text: BTreeMap::from([("en".to_string(), "Alt".to_string())]),
            ..Default::default()
        },
        file: Some(UploadFile {
            content_type: Some(mime.to_string()),
            body: body(bytes),
        }),
    }
}

pub fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    // Flat blocks keep the encoded files small.
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([((x / 64) * 16 % 256) as u8, ((y / 64) * 16 % 256) as u8, 90])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}
