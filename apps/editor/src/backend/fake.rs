//! In-memory [`ResumeBackend`] for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{BackendError, ResumeBackend};
use crate::export::ExportBundle;
use crate::models::resume::{ResumeSummary, StoredResume, SubmissionReceipt};

/// Serves `stored` (or `MissingData` when unset) and records submissions.
/// Every submission fails with a 502 when `fail` is set.
#[derive(Default)]
pub struct FakeBackend {
    pub fail: bool,
    pub stored: Option<(Value, Option<String>)>,
    submissions: AtomicUsize,
    last_resume_id: Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn failing() -> Self {
        FakeBackend {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_stored(json: Value, template: &str) -> Self {
        FakeBackend {
            stored: Some((json, Some(template.to_string()))),
            ..Default::default()
        }
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn last_resume_id(&self) -> Option<String> {
        self.last_resume_id.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResumeBackend for FakeBackend {
    async fn fetch_resume_data(&self, _: &str, _: &str) -> Result<StoredResume, BackendError> {
        match &self.stored {
            Some((json, template)) => Ok(StoredResume {
                parsed_json: json.clone(),
                template: template.clone(),
            }),
            None => Err(BackendError::MissingData),
        }
    }

    async fn submit_edited_result(
        &self,
        _: &str,
        bundle: &ExportBundle,
        user_resume_id: Option<&str>,
    ) -> Result<SubmissionReceipt, BackendError> {
        assert!(bundle.pdf.starts_with(b"%PDF-"));
        self.submissions.fetch_add(1, Ordering::SeqCst);
        *self.last_resume_id.lock().unwrap() = user_resume_id.map(str::to_string);
        if self.fail {
            return Err(BackendError::Status {
                status: 502,
                message: "bad gateway".into(),
            });
        }
        Ok(SubmissionReceipt {
            user_resume_id: Some("saved-1".into()),
            ..Default::default()
        })
    }

    async fn delete_resume(&self, _: &str, _: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn list_resumes(&self, _: &str) -> Result<Vec<ResumeSummary>, BackendError> {
        Ok(Vec::new())
    }
}
