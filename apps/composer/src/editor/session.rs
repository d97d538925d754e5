//! The single editing session: the current document plus what the save/load round trip
//! needs to remember, and the in-flight flags of the async boundary calls.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::models::ResumeDocument;

#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    pub document: ResumeDocument,
    pub resume_name: String,
    /// Set after a load or a successful save; later saves become updates.
    pub editing_id: Option<String>,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_loaded_at: Option<DateTime<Utc>>,
}

impl EditorSession {
    pub fn is_edit_mode(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Replaces the current document with the next one produced by a transition.
    pub fn commit(&mut self, next: ResumeDocument) {
        self.document = next;
    }

    pub fn enter_edit_mode(&mut self, resume_name: String, resume_id: String) {
        self.resume_name = resume_name;
        self.editing_id = Some(resume_id);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-flight flags
// ────────────────────────────────────────────────────────────────────────────

/// The asynchronous boundary calls. At most one of each kind runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Save,
    PhotoUpload,
    Export,
    Import,
    Analyze,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Save => "save",
            Operation::PhotoUpload => "photo upload",
            Operation::Export => "export",
            Operation::Import => "PDF import",
            Operation::Analyze => "analysis",
        }
    }
}

#[derive(Debug, Default)]
pub struct InFlight {
    loading: AtomicBool,
    saving: AtomicBool,
    uploading_photo: AtomicBool,
    exporting: AtomicBool,
    importing: AtomicBool,
    analyzing: AtomicBool,
}

/// Clears its flag when dropped, whether the call succeeded or not.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl InFlight {
    /// Marks `op` as running. Fails with `Busy` when one is already outstanding.
    pub fn begin(&self, op: Operation) -> Result<InFlightGuard<'_>, AppError> {
        let flag = self.flag(op);
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Rejected {}: already in flight", op.label());
            return Err(AppError::Busy(op.label().to_string()));
        }
        Ok(InFlightGuard { flag })
    }

    pub fn is_running(&self, op: Operation) -> bool {
        self.flag(op).load(Ordering::Acquire)
    }

    fn flag(&self, op: Operation) -> &AtomicBool {
        match op {
            Operation::Load => &self.loading,
            Operation::Save => &self.saving,
            Operation::PhotoUpload => &self.uploading_photo,
            Operation::Export => &self.exporting,
            Operation::Import => &self.importing,
            Operation::Analyze => &self.analyzing,
        }
    }
}

/// What the presentation client needs to draw its toolbar state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub resume_name: String,
    pub edit_mode: bool,
    pub editing_id: Option<String>,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_loaded_at: Option<DateTime<Utc>>,
    pub loading: bool,
    pub saving: bool,
    pub uploading_photo: bool,
    pub exporting: bool,
    pub importing: bool,
    pub analyzing: bool,
}

impl SessionStatus {
    pub fn new(session: &EditorSession, in_flight: &InFlight) -> Self {
        Self {
            resume_name: session.resume_name.clone(),
            edit_mode: session.is_edit_mode(),
            editing_id: session.editing_id.clone(),
            last_saved_at: session.last_saved_at,
            last_loaded_at: session.last_loaded_at,
            loading: in_flight.is_running(Operation::Load),
            saving: in_flight.is_running(Operation::Save),
            uploading_photo: in_flight.is_running(Operation::PhotoUpload),
            exporting: in_flight.is_running(Operation::Export),
            importing: in_flight.is_running(Operation::Import),
            analyzing: in_flight.is_running(Operation::Analyze),
        }
    }
}
