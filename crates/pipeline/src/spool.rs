//! Bounded consumption of upload bodies.
//!
//! Images are buffered in memory because they have to be decoded anyway.
//! Videos go to a temporary file so memory stays flat regardless of size.
//! Both paths hash while reading and stop as soon as the byte cap is passed.

use std::path::Path;

use futures::{Stream, StreamExt};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use showcase_core::hashing::StreamingDigest;
use showcase_media::PublishSource;

#[derive(Debug, thiserror::Error)]
pub enum SpoolError {
    #[error("Upload exceeds the {max_bytes} byte limit")]
    TooLarge { max_bytes: u64, received_bytes: u64 },

    #[error("Failed to read upload body: {0}")]
    Read(String),

    #[error("Failed to spool upload: {0}")]
    Io(#[from] std::io::Error),
}

/// An upload body held in memory.
#[derive(Debug)]
pub struct Buffered {
    pub bytes: Vec<u8>,
    pub sha256: String,
}

/// An upload body written to a temporary file, removed on drop.
#[derive(Debug)]
pub struct Spooled {
    path: TempPath,
    len: u64,
    sha256: String,
}

impl Spooled {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// Describe the file for the publisher. `self` must outlive the publish.
    pub fn source(&self) -> PublishSource {
        PublishSource::File {
            path: self.path.to_path_buf(),
            len: self.len,
            sha256: self.sha256.clone(),
        }
    }
}

fn check_cap(received: u64, max_bytes: u64) -> Result<(), SpoolError> {
    if received > max_bytes {
        return Err(SpoolError::TooLarge {
            max_bytes,
            received_bytes: received,
        });
    }
    Ok(())
}

/// Read the whole stream into memory, failing once more than `max_bytes`
/// have arrived.
pub async fn buffer_stream<S, B, E>(stream: S, max_bytes: u64) -> Result<Buffered, SpoolError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut stream = std::pin::pin!(stream);
    let mut bytes = Vec::new();
    let mut digest = StreamingDigest::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| SpoolError::Read(e.to_string()))?;
        let chunk = chunk.as_ref();
        check_cap((bytes.len() + chunk.len()) as u64, max_bytes)?;
        digest.update(chunk);
        bytes.extend_from_slice(chunk);
    }

    Ok(Buffered {
        bytes,
        sha256: digest.finish_hex(),
    })
}

/// Copy the stream into a new temporary file under `dir`. The partial file
/// is removed when the cap is exceeded or reading fails.
pub async fn spool_stream<S, B, E>(
    stream: S,
    max_bytes: u64,
    dir: &Path,
) -> Result<Spooled, SpoolError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let named = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".part")
        .tempfile_in(dir)?;
    let (file, path) = named.into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut stream = std::pin::pin!(stream);
    let mut len: u64 = 0;
    let mut digest = StreamingDigest::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| SpoolError::Read(e.to_string()))?;
        let chunk = chunk.as_ref();
        len += chunk.len() as u64;
        check_cap(len, max_bytes)?;
        digest.update(chunk);
        file.write_all(chunk).await?;
    }
    file.flush().await?;

    tracing::debug!(path = %path.display(), bytes = len, "Upload spooled");

    Ok(Spooled {
        path,
        len,
        sha256: digest.finish_hex(),
    })
}
