use std::sync::{Arc, Mutex as StdMutex, OnceLock};

use async_trait::async_trait;
use axum::{
    extract::{RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    routing::any,
    Router,
};
use reqwest::Url;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api::{ApiError, LoginGrant, ScoreApi, ScoreWrite};
use crate::charts::backend::{ChartBackend, ChartError, ChartHandle};
use crate::charts::spec::{ChartData, ChartSpec};
use crate::intake::analysis::{AnalysisProvider, AnalysisReport, ExtractedScores};
use crate::schemas::{
    ClassAverage, ClassInfo, DashboardStats, Role, ScoreRecord, SessionUser, Student, SubScores,
};
use crate::scores::Grade;

pub(crate) const STUDENT_ID: &str = "s0007";
pub(crate) const STUDENT_PASSWORD: &str = "pw-0007";
pub(crate) const WRONG_PASSWORD: &str = "비밀번호가 일치하지 않습니다";

const CONFIG_VARS: [&str; 12] = [
    "TUTOR_ENV",
    "ENVIRONMENT",
    "TUTOR_STRICT_CONFIG",
    "TUTOR_API_URL",
    "TUTOR_SESSION_FILE",
    "TUTOR_INITIAL_PAGE",
    "MAX_UPLOAD_SIZE_MB",
    "ANALYSIS_LATENCY_MS",
    "ANALYSIS_ENDPOINT",
    "TUTOR_LOG_LEVEL",
    "TUTOR_LOG_JSON",
    "PROMETHEUS_ENABLED",
];

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn clear_env() {
    for key in CONFIG_VARS {
        std::env::remove_var(key);
    }
}

pub(crate) fn student_user() -> SessionUser {
    SessionUser {
        user_id: STUDENT_ID.to_string(),
        role: Role::Student,
        class_id: Some("korea-1".to_string()),
    }
}

/// What the fake spreadsheet service saw for one request.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: String,
    pub(crate) query: String,
    pub(crate) content_type: String,
    pub(crate) body: String,
}

impl RecordedRequest {
    pub(crate) fn param(&self, name: &str) -> Option<String> {
        let url = Url::parse(&format!("http://fake.invalid/?{}", self.query)).ok()?;
        url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct SheetState {
    requests: Arc<StdMutex<Vec<RecordedRequest>>>,
    respond: Responder,
}

/// A local HTTP server standing in for the spreadsheet web app at `/exec`.
pub(crate) struct FakeSheet {
    base_url: Url,
    requests: Arc<StdMutex<Vec<RecordedRequest>>>,
    server: tokio::task::JoinHandle<()>,
}

impl FakeSheet {
    pub(crate) async fn start<F>(respond: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
    {
        let requests = Arc::new(StdMutex::new(Vec::new()));
        let state = SheetState { requests: requests.clone(), respond: Arc::new(respond) };
        let app = Router::new().route("/exec", any(record_request)).with_state(state);

        let listener =
            tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fake sheet");
        let addr = listener.local_addr().expect("fake sheet address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/exec")).expect("fake sheet url");
        Self { base_url, requests, server }
    }

    pub(crate) fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub(crate) fn single_request(&self) -> RecordedRequest {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request, got {requests:?}");
        requests.remove(0)
    }
}

impl Drop for FakeSheet {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record_request(
    State(state): State<SheetState>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let request = RecordedRequest {
        method: method.to_string(),
        query: query.unwrap_or_default(),
        content_type,
        body,
    };

    let (status, reply) = (state.respond)(&request);
    state.requests.lock().expect("requests lock").push(request);
    (StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), reply)
}

/// A URL on a local port nothing is listening on.
pub(crate) async fn unused_local_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    Url::parse(&format!("http://{addr}/exec")).expect("unused url")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BackendCall {
    Create(String, ChartHandle),
    Update(ChartHandle),
    Destroy(ChartHandle),
    Resize(ChartHandle),
}

#[derive(Debug, Default)]
struct BackendLog {
    next_handle: u64,
    live: Vec<ChartHandle>,
    calls: Vec<BackendCall>,
    missing_canvases: Vec<String>,
}

/// Chart backend that records every call. Clones share one log.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingBackend {
    log: Arc<StdMutex<BackendLog>>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn without_canvases(canvases: &[&str]) -> Self {
        let backend = Self::new();
        backend.with_log(|log| {
            log.missing_canvases = canvases.iter().map(|canvas| canvas.to_string()).collect();
        });
        backend
    }

    fn with_log<T>(&self, f: impl FnOnce(&mut BackendLog) -> T) -> T {
        let mut log = self.log.lock().expect("backend log");
        f(&mut log)
    }

    pub(crate) fn calls(&self) -> Vec<BackendCall> {
        self.with_log(|log| log.calls.clone())
    }

    pub(crate) fn creations(&self) -> usize {
        self.with_log(|log| {
            log.calls.iter().filter(|call| matches!(call, BackendCall::Create(..))).count()
        })
    }

    pub(crate) fn resizes(&self) -> usize {
        self.with_log(|log| {
            log.calls.iter().filter(|call| matches!(call, BackendCall::Resize(_))).count()
        })
    }

    pub(crate) fn live_count(&self) -> usize {
        self.with_log(|log| log.live.len())
    }
}

impl ChartBackend for RecordingBackend {
    fn has_canvas(&self, canvas: &str) -> bool {
        self.with_log(|log| !log.missing_canvases.iter().any(|missing| missing == canvas))
    }

    fn create(&mut self, canvas: &str, _spec: &ChartSpec) -> Result<ChartHandle, ChartError> {
        Ok(self.with_log(|log| {
            log.next_handle += 1;
            let handle = ChartHandle(log.next_handle);
            log.live.push(handle);
            log.calls.push(BackendCall::Create(canvas.to_string(), handle));
            handle
        }))
    }

    fn update(&mut self, handle: ChartHandle, _data: &ChartData) -> Result<(), ChartError> {
        self.with_log(|log| {
            if !log.live.contains(&handle) {
                return Err(ChartError::UnknownHandle(handle));
            }
            log.calls.push(BackendCall::Update(handle));
            Ok(())
        })
    }

    fn destroy(&mut self, handle: ChartHandle) {
        self.with_log(|log| {
            log.live.retain(|live| *live != handle);
            log.calls.push(BackendCall::Destroy(handle));
        });
    }

    fn resize(&mut self, handle: ChartHandle) {
        self.with_log(|log| log.calls.push(BackendCall::Resize(handle)));
    }
}

fn score_record(score_id: &str, round: u32, values: [f64; 5], written_date: &str) -> ScoreRecord {
    let scores = SubScores::from_array(values);
    let total_score = scores.total();
    ScoreRecord {
        score_id: Some(score_id.to_string()),
        student_id: STUDENT_ID.to_string(),
        class_id: "korea-1".to_string(),
        assignment_name: "논술 과제".to_string(),
        round,
        written_date: written_date.to_string(),
        scores,
        total_score,
        grade: Grade::from_total(total_score),
        feedback: "• 구성 보완 필요".to_string(),
        attachment_url: None,
    }
}

#[derive(Debug, Default)]
struct FakeApiState {
    created: Vec<ScoreRecord>,
    logins: usize,
    write_rejection: Option<Option<String>>,
    failing: bool,
}

/// In-memory spreadsheet service with a small fixed roster.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    state: StdMutex<FakeApiState>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeApiState) -> T) -> T {
        let mut state = self.state.lock().expect("fake api state");
        f(&mut state)
    }

    /// Every later call fails with an unreadable reply.
    pub(crate) fn fail_requests(&self) {
        self.with_state(|state| state.failing = true);
    }

    pub(crate) fn reject_writes(&self, message: Option<&str>) {
        self.with_state(|state| state.write_rejection = Some(message.map(str::to_string)));
    }

    pub(crate) fn created(&self) -> Vec<ScoreRecord> {
        self.with_state(|state| state.created.clone())
    }

    pub(crate) fn logins(&self) -> usize {
        self.with_state(|state| state.logins)
    }

    fn check(&self, operation: &'static str) -> Result<(), ApiError> {
        if self.with_state(|state| state.failing) {
            return Err(ApiError::Decode { operation, detail: "status 500: expected value".into() });
        }
        Ok(())
    }

    fn roster() -> Vec<Student> {
        [(STUDENT_ID, "김민지", "korea-1"), ("s0008", "이서준", "korea-1"), ("s0011", "박하늘", "yonsei-1")]
            .into_iter()
            .map(|(user_id, name, class_id)| Student {
                user_id: user_id.to_string(),
                name: name.to_string(),
                class_id: class_id.to_string(),
            })
            .collect()
    }

    fn records() -> Vec<ScoreRecord> {
        vec![
            score_record("sc-2", 2, [19.0, 28.0, 18.0, 18.0, 9.0], "2025-03-14T09:00:00.000Z"),
            score_record("sc-1", 1, [17.0, 25.0, 17.0, 16.0, 8.0], "2025-03-07T09:00:00.000Z"),
        ]
    }

    fn not_found(operation: &'static str) -> ApiError {
        ApiError::Rejected { operation, message: Some("not found".to_string()) }
    }
}

#[async_trait]
impl ScoreApi for FakeApi {
    async fn login(&self, user_id: &str, password: &str) -> Result<LoginGrant, ApiError> {
        self.with_state(|state| state.logins += 1);
        self.check("login")?;
        if user_id == STUDENT_ID && password == STUDENT_PASSWORD {
            Ok(LoginGrant { token: "tok-student".to_string(), user: student_user() })
        } else {
            Err(ApiError::Rejected { operation: "login", message: Some(WRONG_PASSWORD.into()) })
        }
    }

    async fn classes(&self) -> Result<Vec<ClassInfo>, ApiError> {
        self.check("list_classes")?;
        Ok(vec![
            ClassInfo { class_id: "korea-1".to_string(), class_name: "고려대반".to_string() },
            ClassInfo { class_id: "yonsei-1".to_string(), class_name: "연세대반".to_string() },
        ])
    }

    async fn class(&self, class_id: &str) -> Result<ClassInfo, ApiError> {
        self.check("get_class")?;
        let classes = self.classes().await?;
        classes
            .into_iter()
            .find(|class| class.class_id == class_id)
            .ok_or_else(|| Self::not_found("get_class"))
    }

    async fn students(&self, class_id: Option<&str>) -> Result<Vec<Student>, ApiError> {
        self.check("list_students")?;
        let class_id = class_id.unwrap_or_default();
        Ok(Self::roster()
            .into_iter()
            .filter(|student| class_id.is_empty() || student.class_id == class_id)
            .collect())
    }

    async fn student(&self, student_id: &str) -> Result<Student, ApiError> {
        self.check("get_student")?;
        Self::roster()
            .into_iter()
            .find(|student| student.user_id == student_id)
            .ok_or_else(|| Self::not_found("get_student"))
    }

    async fn scores(&self, student_id: Option<&str>) -> Result<Vec<ScoreRecord>, ApiError> {
        self.check("list_scores")?;
        let student_id = student_id.unwrap_or_default();
        Ok(Self::records()
            .into_iter()
            .filter(|record| student_id.is_empty() || record.student_id == student_id)
            .collect())
    }

    async fn score(&self, score_id: &str) -> Result<ScoreRecord, ApiError> {
        self.check("get_score")?;
        Self::records()
            .into_iter()
            .find(|record| record.score_id.as_deref() == Some(score_id))
            .ok_or_else(|| Self::not_found("get_score"))
    }

    async fn create_score(&self, record: &ScoreRecord) -> Result<ScoreWrite, ApiError> {
        self.check("create_score")?;
        self.with_state(|state| {
            if let Some(message) = &state.write_rejection {
                let message = message.clone();
                return Err(ApiError::Rejected { operation: "create_score", message });
            }
            state.created.push(record.clone());
            Ok(ScoreWrite { score_id: Some(format!("sc-new-{}", state.created.len())) })
        })
    }

    async fn update_score(
        &self,
        score_id: &str,
        _record: &ScoreRecord,
    ) -> Result<ScoreWrite, ApiError> {
        self.check("update_score")?;
        match self.with_state(|state| state.write_rejection.clone()) {
            Some(message) => Err(ApiError::Rejected { operation: "update_score", message }),
            None => Ok(ScoreWrite { score_id: Some(score_id.to_string()) }),
        }
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.check("dashboard_stats")?;
        Ok(DashboardStats {
            total_students: 42.0,
            weekly_scores: 17.0,
            average_score: 82.5,
            top_students: 6.0,
            class_averages: vec![
                ClassAverage { class_name: "고려대반".to_string(), average: 86.1 },
                ClassAverage { class_name: "연세대반".to_string(), average: 81.4 },
            ],
        })
    }
}

#[derive(Debug)]
enum Scripted {
    Report(AnalysisReport),
    Error(String),
}

/// Analysis provider that answers immediately with a scripted result.
#[derive(Debug)]
pub(crate) struct InstantAnalysis {
    outcome: Scripted,
    seen: StdMutex<Vec<String>>,
}

impl InstantAnalysis {
    fn with(outcome: Scripted) -> Self {
        Self { outcome, seen: StdMutex::new(Vec::new()) }
    }

    pub(crate) fn succeeding() -> Self {
        Self::reporting(AnalysisReport {
            success: true,
            scores: Some(ExtractedScores {
                score1: Some(19.0),
                score2: Some(28.0),
                score3: Some(18.0),
                score4: Some(18.0),
                score5: Some(9.0),
            }),
            feedback: Some("• 논거 연결 양호".to_string()),
            error: None,
        })
    }

    pub(crate) fn reporting(report: AnalysisReport) -> Self {
        Self::with(Scripted::Report(report))
    }

    pub(crate) fn erroring(message: &str) -> Self {
        Self::with(Scripted::Error(message.to_string()))
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().expect("seen urls").len()
    }

    pub(crate) fn seen_urls(&self) -> Vec<String> {
        self.seen.lock().expect("seen urls").clone()
    }
}

#[async_trait]
impl AnalysisProvider for InstantAnalysis {
    async fn analyze(&self, file_url: &str, _mime: &str) -> anyhow::Result<AnalysisReport> {
        self.seen.lock().expect("seen urls").push(file_url.to_string());
        match &self.outcome {
            Scripted::Report(report) => Ok(report.clone()),
            Scripted::Error(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}
