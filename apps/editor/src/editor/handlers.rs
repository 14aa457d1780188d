use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::editor::registry::SharedSession;
use crate::editor::session::{self, EditorSession, InitialData, SaveOutcome, SessionSummary, LOAD_FAILED};
use crate::editor::workspace::{Mode, SectionName, SectionState};
use crate::errors::AppError;
use crate::export::{export_pdf_blocking, COVER_LETTER_FILE_NAME, RESUME_FILE_NAME};
use crate::forms::items::ItemId;
use crate::models::document::{CoverLetterDocument, ResumeDocument};
use crate::render::TemplateKind;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub mode: Mode,
    pub user_id: Option<String>,
    pub resume_id: Option<String>,
    pub initial_data: Option<Value>,
    pub template: Option<String>,
}

#[derive(Deserialize)]
pub struct ModeRequest {
    pub mode: Mode,
}

#[derive(Deserialize)]
pub struct TemplateRequest {
    pub template: String,
}

#[derive(Deserialize)]
pub struct CurrentRequest {
    pub current: bool,
}

#[derive(Deserialize)]
pub struct ExpandedRequest {
    pub item_id: Option<ItemId>,
}

#[derive(Serialize)]
pub struct TemplateInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct ItemCreated {
    pub id: ItemId,
}

async fn find(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Editor session {id} not found")))
}

fn section_name(raw: &str) -> Result<SectionName, AppError> {
    SectionName::parse(raw).ok_or_else(|| AppError::NotFound(format!("Unknown section '{raw}'")))
}

// ────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/editor/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionSummary>), AppError> {
    let mut initial = InitialData::default();
    let mut template = req.template.as_deref().map(TemplateKind::from_name);
    let mut user_resume_id = None;
    let mut load_failed = false;

    match (req.mode, &req.user_id, &req.resume_id) {
        (Mode::Resume, Some(user_id), Some(resume_id)) => {
            match session::fetch_initial(state.backend.as_ref(), user_id, resume_id).await {
                Ok((doc, stored_template)) => {
                    initial.resume = Some(doc);
                    template = template.or(stored_template);
                    user_resume_id = Some(resume_id.clone());
                }
                Err(e) => {
                    warn!("Initial fetch of resume {resume_id} failed: {e}");
                    load_failed = true;
                }
            }
        }
        _ => {
            if let Some(data) = req.initial_data {
                match req.mode {
                    Mode::Resume => {
                        let doc: ResumeDocument = serde_json::from_value(data)
                            .map_err(|e| AppError::UnprocessableEntity(format!("initial_data: {e}")))?;
                        initial.resume = Some(doc);
                    }
                    Mode::CoverLetter => {
                        let doc: CoverLetterDocument = serde_json::from_value(data)
                            .map_err(|e| AppError::UnprocessableEntity(format!("initial_data: {e}")))?;
                        initial.cover_letter = Some(doc);
                    }
                }
            }
        }
    }

    let mut editor = EditorSession::mount(
        req.mode,
        initial,
        template.unwrap_or_default(),
        req.user_id,
        user_resume_id,
        state.config.session_settings(),
    );
    if load_failed {
        editor.notices().post(LOAD_FAILED);
    }
    let summary = editor.summary();
    state.sessions.insert(editor).await;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// DELETE /api/v1/editor/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Editor session {id} not found")))?;
    info!(session = %id, "Editor session unmounted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/editor/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = find(&state, id).await?;
    let summary = session.lock().await.summary();
    Ok(Json(summary))
}

/// DELETE /api/v1/editor/sessions/:id/notice
pub async fn handle_dismiss_notice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = find(&state, id).await?;
    session.lock().await.notices().dismiss();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/editor/sessions/:id/document
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let session = find(&state, id).await?;
    let doc = session
        .lock()
        .await
        .workspace()
        .document_json()
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(doc))
}

/// PUT /api/v1/editor/sessions/:id/mode
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = find(&state, id).await?;
    let mut session = session.lock().await;
    session.switch_mode(req.mode);
    Ok(Json(session.summary()))
}

/// PUT /api/v1/editor/sessions/:id/template
pub async fn handle_set_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = find(&state, id).await?;
    let mut session = session.lock().await;
    session.set_template(TemplateKind::from_name(&req.template));
    Ok(Json(session.summary()))
}

/// GET /api/v1/editor/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(
        TemplateKind::ALL
            .iter()
            .map(|kind| TemplateInfo {
                name: kind.as_str(),
                title: kind.title(),
                description: kind.description(),
            })
            .collect(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Section forms
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/editor/sessions/:id/sections/:section
pub async fn handle_get_section(
    State(state): State<AppState>,
    Path((id, section)): Path<(Uuid, String)>,
) -> Result<Json<SectionState>, AppError> {
    let name = section_name(&section)?;
    let session = find(&state, id).await?;
    let section = session.lock().await.workspace().section(name)?;
    Ok(Json(section))
}

/// PUT /api/v1/editor/sessions/:id/sections/:section
///
/// Replaces the form's draft. The commit settles after the debounce window.
pub async fn handle_replace_section(
    State(state): State<AppState>,
    Path((id, section)): Path<(Uuid, String)>,
    Json(draft): Json<Value>,
) -> Result<Json<SectionState>, AppError> {
    let name = section_name(&section)?;
    let session = find(&state, id).await?;
    let mut session = session.lock().await;
    session.workspace().replace(name, draft)?;
    Ok(Json(session.workspace().section(name)?))
}

/// POST /api/v1/editor/sessions/:id/sections/:section/items
pub async fn handle_append_item(
    State(state): State<AppState>,
    Path((id, section)): Path<(Uuid, String)>,
) -> Result<(StatusCode, Json<ItemCreated>), AppError> {
    let name = section_name(&section)?;
    let session = find(&state, id).await?;
    let item = session
        .lock()
        .await
        .workspace()
        .resume(name)?
        .append_item(name)?;
    Ok((StatusCode::CREATED, Json(ItemCreated { id: item })))
}

/// DELETE /api/v1/editor/sessions/:id/sections/:section/items/:item_id
pub async fn handle_remove_item(
    State(state): State<AppState>,
    Path((id, section, item)): Path<(Uuid, String, ItemId)>,
) -> Result<StatusCode, AppError> {
    let name = section_name(&section)?;
    let session = find(&state, id).await?;
    session
        .lock()
        .await
        .workspace()
        .resume(name)?
        .remove_item(name, item)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/editor/sessions/:id/sections/:section/items/:item_id/current
pub async fn handle_set_current(
    State(state): State<AppState>,
    Path((id, section, item)): Path<(Uuid, String, ItemId)>,
    Json(req): Json<CurrentRequest>,
) -> Result<Json<SectionState>, AppError> {
    let name = section_name(&section)?;
    let session = find(&state, id).await?;
    let mut session = session.lock().await;
    session
        .workspace()
        .resume(name)?
        .set_current(name, item, req.current)?;
    Ok(Json(session.workspace().section(name)?))
}

/// PUT /api/v1/editor/sessions/:id/sections/:section/expanded
pub async fn handle_set_expanded(
    State(state): State<AppState>,
    Path((id, section)): Path<(Uuid, String)>,
    Json(req): Json<ExpandedRequest>,
) -> Result<StatusCode, AppError> {
    let name = section_name(&section)?;
    let session = find(&state, id).await?;
    session
        .lock()
        .await
        .workspace()
        .resume(name)?
        .set_expanded(name, req.item_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Preview, export, save
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/editor/sessions/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let session = find(&state, id).await?;
    let preview = session.lock().await.preview();
    Ok(Html(preview.to_page()))
}

/// GET /api/v1/editor/sessions/:id/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = find(&state, id).await?;
    let (preview, mode) = {
        let session = session.lock().await;
        (session.preview(), session.mode())
    };
    let pdf = export_pdf_blocking(preview).await?;
    let file_name = match mode {
        Mode::Resume => RESUME_FILE_NAME,
        Mode::CoverLetter => COVER_LETTER_FILE_NAME,
    };
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        pdf,
    ))
}

/// POST /api/v1/editor/sessions/:id/save
///
/// Always answers 200; a failed save is reported in the outcome body and as
/// the session's current notice.
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveOutcome>, AppError> {
    let session = find(&state, id).await?;
    let outcome = session::save(&session, state.backend.as_ref()).await;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, Response};
    use axum::Router;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::backend::fake::FakeBackend;
    use crate::config::Config;
    use crate::editor::registry::SessionRegistry;
    use crate::routes::build_router;
    use crate::state::AppState;

    use super::*;

    fn app_with(backend: FakeBackend) -> (Router, AppState) {
        let state = AppState {
            config: Config {
                backend_url: "http://127.0.0.1:9".into(),
                port: 0,
                rust_log: "info".into(),
                debounce: Duration::from_millis(300),
                notice_ttl: Duration::from_millis(2000),
                download_dir: None,
                session_idle: Duration::from_secs(3600),
            },
            backend: Arc::new(backend),
            sessions: SessionRegistry::default(),
        };
        (build_router(state.clone()), state)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(req.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(res: Response<Body>) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, body: Value) -> String {
        let res = call(app, Method::POST, "/api/v1/editor/sessions", Some(body)).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        json_body(res).await["id"].as_str().unwrap().to_string()
    }

    fn resume_data() -> Value {
        json!({
            "personalInfo": {"firstname": "Ada", "lastname": "Lovelace"},
            "workExperiences": [{"name": "Acme", "position": "Engineer", "startDate": "2020-01-01"}]
        })
    }

    #[tokio::test]
    async fn test_create_and_fetch_session() {
        let (app, _) = app_with(FakeBackend::default());
        let id = create(&app, json!({"initial_data": resume_data(), "template": "modern"})).await;

        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}"), None).await;
        let summary = json_body(res).await;
        assert_eq!(summary["mode"], "resume");
        assert_eq!(summary["template"], "modern");

        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}/document"), None).await;
        assert_eq!(json_body(res).await["personalInfo"]["firstname"], "Ada");
    }

    #[tokio::test]
    async fn test_create_fetches_stored_resume() {
        let backend = FakeBackend::with_stored(resume_data(), "double");
        let (app, _) = app_with(backend);
        let id = create(&app, json!({"user_id": "u1", "resume_id": "r1"})).await;

        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}"), None).await;
        let summary = json_body(res).await;
        assert_eq!(summary["template"], "double");
        assert_eq!(summary["user_resume_id"], "r1");
        assert!(summary["notice"].is_null());
    }

    #[tokio::test]
    async fn test_failed_fetch_mounts_blank_with_notice() {
        let (app, _) = app_with(FakeBackend::default());
        let res = call(
            &app,
            Method::POST,
            "/api/v1/editor/sessions",
            Some(json!({"user_id": "u1", "resume_id": "missing"})),
        )
        .await;
        let summary = json_body(res).await;
        assert_eq!(summary["notice"]["message"], LOAD_FAILED);

        let id = summary["id"].as_str().unwrap();
        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}/document"), None).await;
        assert_eq!(json_body(res).await["personalInfo"]["firstname"], "");
    }

    #[tokio::test]
    async fn test_notice_can_be_dismissed() {
        let (app, _) = app_with(FakeBackend::default());
        let res = call(
            &app,
            Method::POST,
            "/api/v1/editor/sessions",
            Some(json!({"user_id": "u1", "resume_id": "missing"})),
        )
        .await;
        let id = json_body(res).await["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/editor/sessions/{id}/notice");
        let res = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}"), None).await;
        assert!(json_body(res).await["notice"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_session_and_section() {
        let (app, _) = app_with(FakeBackend::default());
        let missing = Uuid::new_v4();
        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{missing}"), None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(res).await["error"]["code"], "NOT_FOUND");

        let id = create(&app, json!({})).await;
        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}/sections/hobbies"), None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_section_edit_and_items() {
        let (app, _) = app_with(FakeBackend::default());
        let id = create(&app, json!({"initial_data": resume_data()})).await;
        let base = format!("/api/v1/editor/sessions/{id}/sections");

        let res = call(&app, Method::POST, &format!("{base}/education/items"), None).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let item = json_body(res).await["id"].as_str().unwrap().to_string();

        let res = call(
            &app,
            Method::PUT,
            &format!("{base}/education/items/{item}/current"),
            Some(json!({"current": true})),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = call(&app, Method::DELETE, &format!("{base}/education/items/{item}"), None).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let res = call(&app, Method::DELETE, &format!("{base}/education/items/{item}"), None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = call(&app, Method::POST, &format!("{base}/skills/items"), None).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = call(
            &app,
            Method::PUT,
            &format!("{base}/skills"),
            Some(json!({"description": "<p>Rust</p>"})),
        )
        .await;
        let state = json_body(res).await;
        assert_eq!(state["draft"]["description"], "<p>Rust</p>");
        assert_eq!(state["errors"], json!([]));

        let res = call(&app, Method::PUT, &format!("{base}/personal-info"), Some(json!("nope"))).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cover_letter_mode_rejects_resume_sections() {
        let (app, _) = app_with(FakeBackend::default());
        let id = create(&app, json!({})).await;
        let res = call(
            &app,
            Method::PUT,
            &format!("/api/v1/editor/sessions/{id}/mode"),
            Some(json!({"mode": "cover-letter"})),
        )
        .await;
        assert_eq!(json_body(res).await["mode"], "cover-letter");

        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}/sections/personal-info"), None).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}/sections/cover-letter"), None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_preview_and_pdf() {
        let (app, _) = app_with(FakeBackend::default());
        let id = create(&app, json!({"initial_data": resume_data()})).await;

        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}/preview"), None).await;
        assert!(res.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        let html = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("Lovelace"));

        let res = call(&app, Method::GET, &format!("/api/v1/editor/sessions/{id}/pdf"), None).await;
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/pdf");
        let pdf = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_template_selection_and_listing() {
        let (app, _) = app_with(FakeBackend::default());
        let res = call(&app, Method::GET, "/api/v1/editor/templates", None).await;
        let templates = json_body(res).await;
        assert_eq!(templates.as_array().unwrap().len(), TemplateKind::ALL.len());

        let id = create(&app, json!({})).await;
        let res = call(
            &app,
            Method::PUT,
            &format!("/api/v1/editor/sessions/{id}/template"),
            Some(json!({"template": "minimalist"})),
        )
        .await;
        assert_eq!(json_body(res).await["template"], "minimalist");
    }

    #[tokio::test]
    async fn test_save_and_unmount() {
        let (app, state) = app_with(FakeBackend::default());
        let id = create(&app, json!({"user_id": "u1", "initial_data": resume_data()})).await;

        let res = call(&app, Method::POST, &format!("/api/v1/editor/sessions/{id}/save"), None).await;
        let outcome = json_body(res).await;
        assert_eq!(outcome["saved"], true);
        assert_eq!(outcome["uploaded"], true);
        assert_eq!(outcome["user_resume_id"], "saved-1");

        let res = call(&app, Method::DELETE, &format!("/api/v1/editor/sessions/{id}"), None).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_save_validation_failure_is_reported() {
        let (app, _) = app_with(FakeBackend::default());
        let id = create(&app, json!({"user_id": "u1"})).await;
        let res = call(&app, Method::POST, &format!("/api/v1/editor/sessions/{id}/save"), None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let outcome = json_body(res).await;
        assert_eq!(outcome["saved"], false);
        assert_eq!(outcome["message"], session::NAME_REQUIRED);
    }
}
