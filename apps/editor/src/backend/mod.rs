//! Client for the backend collaborator that stores résumés.
//!
//! The editor only needs four calls: fetch a stored résumé, submit an edited
//! one, delete one and list a user's uploads. Every call is attempted once;
//! a failed save is reported to the user, who triggers it again.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod fake;

use crate::export::ExportBundle;
use crate::models::resume::{ParsingStatus, ResumeSummary, StoredResume, SubmissionReceipt};

const GET_RESUME_DATA: &str = "/api/v1/getresumedata";
const HANDLE_EDITED_RESULT: &str = "/api/v1/handleeditedresult";
const DELETE_RESUME: &str = "/api/v1/deleteresume";
const FETCH_USER_DATA: &str = "/api/v1/fetchuserdata";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("backend response has no data")]
    MissingData,
}

/// `{ "data": ..., "message": ... }`, the envelope every endpoint answers with.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    user_id: &'a str,
    resume_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct UserData {
    #[serde(default)]
    uploaded_resume: Vec<UploadedResume>,
    #[serde(default)]
    parsed_resume_json: Vec<ParsedJson>,
}

#[derive(Debug, Deserialize)]
struct UploadedResume {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    resume_url: Option<String>,
    #[serde(default)]
    public_url: Option<String>,
    #[serde(default)]
    cloud_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParsedJson {
    #[serde(default)]
    cloud_path: Option<String>,
    #[serde(default)]
    public_url: Option<String>,
}

#[async_trait]
pub trait ResumeBackend: Send + Sync {
    async fn fetch_resume_data(
        &self,
        user_id: &str,
        resume_id: &str,
    ) -> Result<StoredResume, BackendError>;

    /// Uploads the exported PDF with the document JSON and template name.
    async fn submit_edited_result(
        &self,
        user_id: &str,
        bundle: &ExportBundle,
        user_resume_id: Option<&str>,
    ) -> Result<SubmissionReceipt, BackendError>;

    async fn delete_resume(&self, user_id: &str, resume_id: &str) -> Result<(), BackendError>;

    async fn list_resumes(&self, user_id: &str) -> Result<Vec<ResumeSummary>, BackendError>;
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Rejects non-2xx responses, then decodes the envelope's `data`.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<Option<T>, BackendError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "Backend call rejected");
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: body,
            });
        }
        if body.trim().is_empty() {
            return Ok(None);
        }
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ResumeBackend for BackendClient {
    async fn fetch_resume_data(
        &self,
        user_id: &str,
        resume_id: &str,
    ) -> Result<StoredResume, BackendError> {
        debug!(user_id, resume_id, "Fetching stored résumé");
        let response = self
            .client
            .get(self.url(GET_RESUME_DATA))
            .query(&[("user_id", user_id), ("resume_id", resume_id)])
            .send()
            .await?;
        Self::decode(response).await?.ok_or(BackendError::MissingData)
    }

    async fn submit_edited_result(
        &self,
        user_id: &str,
        bundle: &ExportBundle,
        user_resume_id: Option<&str>,
    ) -> Result<SubmissionReceipt, BackendError> {
        let file = Part::bytes(bundle.pdf.to_vec())
            .file_name(bundle.file_name)
            .mime_str("application/pdf")?;
        let mut form = Form::new()
            .part("file", file)
            .text("resumeData", serde_json::to_string(&bundle.document_json)?)
            .text("template", bundle.template.as_str());
        if let Some(id) = user_resume_id {
            form = form.text("user_resume_id", id.to_string());
        }

        debug!(user_id, bytes = bundle.pdf.len(), "Submitting edited résumé");
        let response = self
            .client
            .post(self.url(HANDLE_EDITED_RESULT))
            .query(&[("user_id", user_id)])
            .multipart(form)
            .send()
            .await?;
        Ok(Self::decode(response).await?.unwrap_or_default())
    }

    async fn delete_resume(&self, user_id: &str, resume_id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url(DELETE_RESUME))
            .json(&DeleteRequest { user_id, resume_id })
            .send()
            .await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn list_resumes(&self, user_id: &str) -> Result<Vec<ResumeSummary>, BackendError> {
        let response = self
            .client
            .get(self.url(FETCH_USER_DATA))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        let data: UserData = Self::decode(response).await?.unwrap_or_default();
        Ok(join_uploads(data))
    }
}

/// `"a/b/1743795375.0088_cv.pdf"` → `"1743795375"`.
fn base_name(cloud_path: &str) -> &str {
    let file = cloud_path.rsplit('/').next().unwrap_or(cloud_path);
    file.split('.').next().unwrap_or(file)
}

/// Pairs each upload with its parsed JSON by file base name.
fn join_uploads(data: UserData) -> Vec<ResumeSummary> {
    let parsed: Vec<(&str, Option<&String>)> = data
        .parsed_resume_json
        .iter()
        .map(|j| {
            (
                base_name(j.cloud_path.as_deref().unwrap_or_default()),
                j.public_url.as_ref(),
            )
        })
        .collect();

    data.uploaded_resume
        .iter()
        .enumerate()
        .map(|(index, upload)| {
            let cloud_path = upload.cloud_path.clone().unwrap_or_default();
            let key = base_name(&cloud_path);
            let json_url = parsed
                .iter()
                .find(|(name, _)| !key.is_empty() && *name == key)
                .and_then(|(_, url)| url.cloned());
            let name = upload.file_name.clone().unwrap_or_else(|| {
                match cloud_path.rsplit('/').next().filter(|f| !f.is_empty()) {
                    Some(file) => file.to_string(),
                    None => format!("Resume {}", index + 1),
                }
            });
            ResumeSummary {
                id: upload.id.clone(),
                name,
                url: upload.resume_url.clone().or_else(|| upload.public_url.clone()),
                parsing_status: json_url.as_ref().map(|_| ParsingStatus::Completed),
                json_url,
                cloud_path: upload.cloud_path.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TemplateKind;
    use axum::extract::{Multipart, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use bytes::Bytes;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> BackendClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        BackendClient::new(&format!("http://{addr}/")).unwrap()
    }

    fn bundle() -> ExportBundle {
        ExportBundle {
            document_json: json!({"personalInfo": {"firstname": "Ada"}}),
            template: TemplateKind::Modern,
            pdf: Bytes::from_static(b"%PDF-1.5 test"),
            file_name: "resume.pdf",
        }
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("u/1/1743795375.008884_Ada_CV.pdf"), "1743795375");
        assert_eq!(base_name("1743795375.json"), "1743795375");
        assert_eq!(base_name(""), "");
    }

    #[test]
    fn test_join_uploads() {
        let data: UserData = serde_json::from_value(json!({
            "uploaded_resume": [
                {"id": "r1", "file_name": "Ada.pdf", "resume_url": "https://s/1", "cloud_path": "u/1743795375.0088_Ada.pdf"},
                {"cloud_path": "u/99.pdf", "public_url": "https://s/2"},
                {}
            ],
            "parsed_resume_json": [
                {"cloud_path": "json/1743795375.json", "public_url": "https://s/1.json"}
            ]
        }))
        .unwrap();
        let list = join_uploads(data);
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].json_url.as_deref(), Some("https://s/1.json"));
        assert_eq!(list[0].parsing_status, Some(ParsingStatus::Completed));
        assert_eq!(list[1].name, "99.pdf");
        assert_eq!(list[1].url.as_deref(), Some("https://s/2"));
        assert_eq!(list[1].parsing_status, None);
        assert_eq!(list[2].name, "Resume 3");
        assert_eq!(list[2].json_url, None);
    }

    #[tokio::test]
    async fn test_fetch_resume_data() {
        let router = Router::new().route(
            GET_RESUME_DATA,
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("user_id").map(String::as_str), Some("u1"));
                Json(json!({
                    "data": {"parsed_json": {"resume_id": q["resume_id"]}, "template": "double"},
                    "message": "ok"
                }))
            }),
        );
        let client = serve(router).await;
        let stored = client.fetch_resume_data("u1", "r9").await.unwrap();
        assert_eq!(stored.parsed_json["resume_id"], "r9");
        assert_eq!(stored.template.as_deref(), Some("double"));
    }

    #[tokio::test]
    async fn test_fetch_without_data() {
        let router = Router::new().route(
            GET_RESUME_DATA,
            get(|| async { Json(json!({"message": "not found"})) }),
        );
        let client = serve(router).await;
        let err = client.fetch_resume_data("u1", "r1").await.unwrap_err();
        assert!(matches!(err, BackendError::MissingData));
    }

    #[tokio::test]
    async fn test_submit_sends_multipart() {
        let router = Router::new().route(
            HANDLE_EDITED_RESULT,
            post(|mut multipart: Multipart| async move {
                let mut fields = HashMap::new();
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(str::to_string);
                    let value = field.bytes().await.unwrap();
                    let value = match file_name {
                        Some(f) => format!("{f}:{}", value.len()),
                        None => String::from_utf8_lossy(&value).into_owned(),
                    };
                    fields.insert(name, value);
                }
                Json(json!({"data": {"user_resume_id": "saved-1", "fields": fields}}))
            }),
        );
        let client = serve(router).await;
        let receipt = client
            .submit_edited_result("u1", &bundle(), Some("prev"))
            .await
            .unwrap();
        assert_eq!(receipt.user_resume_id.as_deref(), Some("saved-1"));
    }

    #[tokio::test]
    async fn test_submit_fields() {
        let router = Router::new().route(
            HANDLE_EDITED_RESULT,
            post(|mut multipart: Multipart| async move {
                let mut seen = Vec::new();
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let text = field.text().await.unwrap_or_default();
                    seen.push((name, text));
                }
                let names: Vec<&str> = seen.iter().map(|(n, _)| n.as_str()).collect();
                if names != ["file", "resumeData", "template"] {
                    return (StatusCode::BAD_REQUEST, Json(json!({"fields": names}))).into_response();
                }
                let data: Value = serde_json::from_str(&seen[1].1).unwrap();
                assert_eq!(data["personalInfo"]["firstname"], "Ada");
                assert_eq!(seen[2].1, "modern");
                Json(json!({"data": {}})).into_response()
            }),
        );
        let client = serve(router).await;
        let receipt = client.submit_edited_result("u1", &bundle(), None).await.unwrap();
        assert_eq!(receipt.user_resume_id, None);
    }

    #[tokio::test]
    async fn test_rejected_status() {
        let router = Router::new().route(
            DELETE_RESUME,
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = serve(router).await;
        let err = client.delete_resume("u1", "r1").await.unwrap_err();
        match err {
            BackendError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let router = Router::new()
            .route(
                DELETE_RESUME,
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["resume_id"], "r1");
                    Json(json!({"message": "deleted"}))
                }),
            )
            .route(
                FETCH_USER_DATA,
                get(|| async {
                    Json(json!({"data": {"uploaded_resume": [{"file_name": "cv.pdf", "cloud_path": "u/1.pdf"}]}}))
                }),
            );
        let client = serve(router).await;
        client.delete_resume("u1", "r1").await.unwrap();
        let list = client.list_resumes("u1").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "cv.pdf");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let client = BackendClient::new("http://127.0.0.1:9").unwrap();
        let err = client.list_resumes("u1").await.unwrap_err();
        assert!(matches!(err, BackendError::Http(_)));
    }
}
