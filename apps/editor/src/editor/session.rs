//! One mounted editor: its workspace, template choice, notices and the save
//! flow that ties the forms, the renderer, the export and the backend together.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::backend::{BackendError, ResumeBackend};
use crate::editor::notice::{Notice, NoticeBoard};
use crate::editor::workspace::{CoverLetterWorkspace, Mode, ResumeWorkspace, Workspace};
use crate::export::{
    export_pdf_blocking, ExportBundle, ExportError, COVER_LETTER_FILE_NAME, RESUME_FILE_NAME,
};
use crate::models::document::{CoverLetterDocument, ResumeDocument};
use crate::render::{RenderedPreview, TemplateKind};
use crate::text::is_semantically_empty;

pub const NAME_REQUIRED: &str = "First name and last name are required.";
pub const WORK_REQUIRED: &str = "At least one work experience is required.";
pub const COVER_LETTER_REQUIRED: &str = "Cover letter content is required.";
pub const RENDER_FAILED: &str = "Error generating the PDF. Please try again.";
pub const SAVE_FAILED: &str = "Error saving the resume. Please try again.";
pub const LOAD_FAILED: &str = "Error loading resume data. Please try again.";

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub debounce: Duration,
    pub notice_ttl: Duration,
    pub download_dir: Option<PathBuf>,
}

/// What the editor was mounted with. Switching modes remounts from here.
#[derive(Debug, Clone, Default)]
pub struct InitialData {
    pub resume: Option<ResumeDocument>,
    pub cover_letter: Option<CoverLetterDocument>,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("PDF export failed: {0}")]
    Render(#[from] ExportError),

    #[error("backend call failed: {0}")]
    Network(#[from] BackendError),
}

impl SaveError {
    /// The transient message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            SaveError::Validation(msg) => *msg,
            SaveError::Render(_) => RENDER_FAILED,
            SaveError::Network(_) => SAVE_FAILED,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_bytes: Option<usize>,
    pub uploaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_resume_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub mode: Mode,
    pub template: TemplateKind,
    pub template_title: &'static str,
    pub user_resume_id: Option<String>,
    pub pending: bool,
    pub notice: Option<Notice>,
}

/// Everything the save flow needs once the session lock is released.
struct SavePlan {
    mode: Mode,
    preview: RenderedPreview,
    document_json: serde_json::Value,
    template: TemplateKind,
    user_id: Option<String>,
    user_resume_id: Option<String>,
    download_dir: Option<PathBuf>,
}

struct SaveDone {
    pdf_bytes: usize,
    download_path: Option<PathBuf>,
    user_resume_id: Option<String>,
    uploaded: bool,
}

pub struct EditorSession {
    id: Uuid,
    user_id: Option<String>,
    template: TemplateKind,
    user_resume_id: Option<String>,
    initial: InitialData,
    workspace: Workspace,
    notices: NoticeBoard,
    settings: SessionSettings,
}

impl EditorSession {
    pub fn mount(
        mode: Mode,
        initial: InitialData,
        template: TemplateKind,
        user_id: Option<String>,
        user_resume_id: Option<String>,
        settings: SessionSettings,
    ) -> Self {
        let workspace = mount_workspace(mode, &initial, settings.debounce);
        let session = EditorSession {
            id: Uuid::new_v4(),
            user_id,
            template,
            user_resume_id,
            initial,
            workspace,
            notices: NoticeBoard::new(settings.notice_ttl),
            settings,
        };
        info!(session = %session.id, ?mode, template = template.as_str(), "Editor session mounted");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.workspace.mode()
    }

    pub fn template(&self) -> TemplateKind {
        self.template
    }

    pub fn set_template(&mut self, template: TemplateKind) {
        self.template = template;
    }

    pub fn workspace(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn notices(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    /// Remounts the editor in `mode` from the initial data. Pending commits
    /// of the old forms are cancelled.
    pub fn switch_mode(&mut self, mode: Mode) -> bool {
        if mode == self.mode() {
            return false;
        }
        self.workspace = mount_workspace(mode, &self.initial, self.settings.debounce);
        info!(session = %self.id, ?mode, "Editor mode switched");
        true
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            mode: self.mode(),
            template: self.template,
            template_title: self.template.title(),
            user_resume_id: self.user_resume_id.clone(),
            pending: self.workspace.is_pending(),
            notice: self.notices.current().cloned(),
        }
    }

    pub fn preview(&self) -> RenderedPreview {
        self.workspace.render(self.template)
    }

    /// Minimum content required before anything is exported.
    pub fn validate_for_export(&self) -> Result<(), SaveError> {
        match &self.workspace {
            Workspace::Resume(ws) => ws.store().read(|doc| {
                if doc.first_name().is_none() || doc.last_name().is_none() {
                    return Err(SaveError::Validation(NAME_REQUIRED));
                }
                if doc.work_experiences.as_ref().map_or(true, |w| w.is_empty()) {
                    return Err(SaveError::Validation(WORK_REQUIRED));
                }
                Ok(())
            }),
            Workspace::CoverLetter(ws) => ws.store().read(|doc| {
                match doc.description.as_deref() {
                    Some(d) if !is_semantically_empty(d) => Ok(()),
                    _ => Err(SaveError::Validation(COVER_LETTER_REQUIRED)),
                }
            }),
        }
    }

    fn prepare_save(&mut self) -> Result<SavePlan, SaveError> {
        self.workspace.flush();
        self.validate_for_export()?;
        let document_json = self
            .workspace
            .document_json()
            .map_err(|e| SaveError::Render(ExportError::Encode(e.to_string())))?;
        Ok(SavePlan {
            mode: self.mode(),
            preview: self.preview(),
            document_json,
            template: self.template,
            user_id: self.user_id.clone(),
            user_resume_id: self.user_resume_id.clone(),
            download_dir: self.settings.download_dir.clone(),
        })
    }

    fn complete(&mut self, done: SaveDone) -> SaveOutcome {
        if let Some(id) = &done.user_resume_id {
            self.user_resume_id = Some(id.clone());
        }
        info!(
            session = %self.id,
            bytes = done.pdf_bytes,
            uploaded = done.uploaded,
            "Save completed"
        );
        SaveOutcome {
            saved: true,
            message: None,
            pdf_bytes: Some(done.pdf_bytes),
            uploaded: done.uploaded,
            download_path: done.download_path,
            user_resume_id: self.user_resume_id.clone(),
        }
    }

    fn fail(&mut self, err: SaveError) -> SaveOutcome {
        match &err {
            SaveError::Validation(msg) => warn!(session = %self.id, "Save blocked: {msg}"),
            SaveError::Render(e) => error!(session = %self.id, "PDF export failed: {e}"),
            SaveError::Network(e) => error!(session = %self.id, "Upload failed: {e}"),
        }
        let message = err.user_message();
        self.notices.post(message);
        SaveOutcome {
            saved: false,
            message: Some(message),
            pdf_bytes: None,
            uploaded: false,
            download_path: None,
            user_resume_id: self.user_resume_id.clone(),
        }
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        if self.workspace.is_pending() {
            info!(session = %self.id, "Unmounted with pending commits; cancelled");
        }
    }
}

fn mount_workspace(mode: Mode, initial: &InitialData, debounce: Duration) -> Workspace {
    match mode {
        Mode::Resume => Workspace::Resume(ResumeWorkspace::mount(
            initial.resume.clone().unwrap_or_else(ResumeDocument::blank),
            debounce,
        )),
        Mode::CoverLetter => Workspace::CoverLetter(CoverLetterWorkspace::mount(
            initial.cover_letter.clone().unwrap_or_default(),
            debounce,
        )),
    }
}

/// Fetches a stored résumé to seed a new session.
pub async fn fetch_initial(
    backend: &dyn ResumeBackend,
    user_id: &str,
    resume_id: &str,
) -> Result<(ResumeDocument, Option<TemplateKind>), BackendError> {
    let stored = backend.fetch_resume_data(user_id, resume_id).await?;
    let doc: ResumeDocument = serde_json::from_value(stored.parsed_json)?;
    Ok((doc, stored.template.as_deref().map(TemplateKind::from_name)))
}

/// The full save: flush, validate, export, optionally download, upload.
///
/// Never returns an error: every failure becomes a notice on the session and
/// an unsuccessful [`SaveOutcome`]. The session lock is not held while the
/// export and upload run.
pub async fn save(session: &Mutex<EditorSession>, backend: &dyn ResumeBackend) -> SaveOutcome {
    let plan = {
        let mut s = session.lock().await;
        match s.prepare_save() {
            Ok(plan) => plan,
            Err(e) => return s.fail(e),
        }
    };
    let result = run_save(plan, backend).await;
    let mut s = session.lock().await;
    match result {
        Ok(done) => s.complete(done),
        Err(e) => s.fail(e),
    }
}

async fn run_save(plan: SavePlan, backend: &dyn ResumeBackend) -> Result<SaveDone, SaveError> {
    let pdf = export_pdf_blocking(plan.preview).await?;
    let bundle = ExportBundle {
        document_json: plan.document_json,
        template: plan.template,
        pdf,
        file_name: match plan.mode {
            Mode::Resume => RESUME_FILE_NAME,
            Mode::CoverLetter => COVER_LETTER_FILE_NAME,
        },
    };

    let download_path = match &plan.download_dir {
        Some(dir) => Some(
            bundle
                .download_to(dir)
                .await
                .map_err(|e| ExportError::Encode(format!("could not write download: {e}")))?,
        ),
        None => None,
    };

    let receipt = match (plan.mode, plan.user_id.as_deref()) {
        (Mode::Resume, Some(user_id)) => Some(
            backend
                .submit_edited_result(user_id, &bundle, plan.user_resume_id.as_deref())
                .await?,
        ),
        _ => None,
    };

    Ok(SaveDone {
        pdf_bytes: bundle.pdf.len(),
        download_path,
        uploaded: receipt.is_some(),
        user_resume_id: receipt.and_then(|r| r.user_resume_id),
    })
}
