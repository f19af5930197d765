//! History store keeping one pretty-printed JSON file per caller.

use async_trait::async_trait;
use parallelai_application::ports::conversation_recorder::{ConversationRecorder, RecorderError};
use parallelai_domain::{CallerId, ConsensusResult, ConversationEntry, EntryId, InvocationResult};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Readable caller-id characters kept at the front of a history file name
const NAME_PREFIX_CHARS: usize = 32;

/// Hex digits of the caller-id digest in a history file name
const DIGEST_CHARS: usize = 32;

/// File-backed history: `<dir>/<caller>-<digest>.json` holds the caller's entries
/// in recording order.
///
/// Each write rewrites the whole file under one lock, so concurrent
/// requests in this process never interleave.
pub struct JsonFileConversationStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileConversationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding a caller's history: `<prefix>-<digest>.json`.
    ///
    /// The prefix is the caller id with anything outside `[A-Za-z0-9_-]`
    /// replaced by `_`, cut to [`NAME_PREFIX_CHARS`]; it only keeps the
    /// directory readable. The SHA-256 digest of the raw id is what tells
    /// callers apart, so ids that sanitise alike still get separate files.
    pub fn path_for(&self, caller: &CallerId) -> PathBuf {
        let prefix: String = caller
            .as_str()
            .chars()
            .take(NAME_PREFIX_CHARS)
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let mut hasher = Sha256::new();
        hasher.update(caller.as_str().as_bytes());
        let digest = format!("{:x}", hasher.finalize());

        self.dir
            .join(format!("{}-{}.json", prefix, &digest[..DIGEST_CHARS]))
    }

    async fn load(&self, caller: &CallerId) -> Result<Vec<ConversationEntry>, RecorderError> {
        let path = self.path_for(caller);
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                RecorderError::Storage(format!("Corrupt history {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(storage_error(&path, e)),
        }
    }

    async fn save(
        &self,
        caller: &CallerId,
        entries: &[ConversationEntry],
    ) -> Result<(), RecorderError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error(&self.dir, e))?;

        let path = self.path_for(caller);
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| RecorderError::Storage(e.to_string()))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| storage_error(&path, e))?;

        debug!("Saved {} entries to {}", entries.len(), path.display());
        Ok(())
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> RecorderError {
    RecorderError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl ConversationRecorder for JsonFileConversationStore {
    async fn record(
        &self,
        caller: &CallerId,
        entry: ConversationEntry,
    ) -> Result<EntryId, RecorderError> {
        let _guard = self.lock.lock().await;
        let id = entry.id;
        let mut entries = self.load(caller).await?;
        entries.push(entry);
        self.save(caller, &entries).await?;
        Ok(id)
    }

    async fn attach_consensus(
        &self,
        caller: &CallerId,
        entry_id: EntryId,
        consensus: ConsensusResult,
    ) -> Result<(), RecorderError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load(caller).await?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or(RecorderError::NotFound(entry_id))?;
        entry.consensus = Some(consensus);
        self.save(caller, &entries).await
    }

    async fn find(
        &self,
        caller: &CallerId,
        entry_id: EntryId,
    ) -> Result<Option<ConversationEntry>, RecorderError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load(caller)
            .await?
            .into_iter()
            .find(|e| e.id == entry_id))
    }

    async fn history(&self, caller: &CallerId) -> Result<Vec<ConversationEntry>, RecorderError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load(caller).await?;
        entries.reverse();
        Ok(entries)
    }

    /// Latest-entry check and write happen under one lock
    async fn attach_consensus_to_latest(
        &self,
        caller: &CallerId,
        question: &str,
        results: Vec<InvocationResult>,
        consensus: ConsensusResult,
    ) -> Result<EntryId, RecorderError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load(caller).await?;

        let id = match entries.last_mut() {
            Some(latest) if latest.is_multi_for(question) => {
                latest.consensus = Some(consensus);
                latest.id
            }
            _ => {
                let entry = ConversationEntry::multi_from_results(question, results)
                    .with_consensus(consensus);
                let id = entry.id;
                entries.push(entry);
                id
            }
        };

        self.save(caller, &entries).await?;
        Ok(id)
    }
}
