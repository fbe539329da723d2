use std::sync::Arc;

use crate::api::ScoreApi;
use crate::charts::{self, ChartBackend, ChartRegistry};
use crate::core::config::Settings;
use crate::dashboard;
use crate::intake::listing::{self, FileEntry};
use crate::intake::{AnalysisProvider, IntakePipeline, IntakeState, UploadFile};
use crate::navigation::{Navigator, Page, PageInit, SubmissionKind};
use crate::schemas::LoginForm;
use crate::scores::{self, selection, ScoreForm, SubScoreField, SubmitOutcome};
use crate::screen::{Layout, Screen};
use crate::session::{Reload, SessionStore};
use crate::student_view;

pub const UPLOAD_COMING_SOON: &str = "파일 업로드 기능은 곧 추가됩니다";
pub const SAVED: &str = "저장되었습니다!";

/// What a form submission on the active page did.
#[derive(Debug)]
pub enum Submission {
    Score(SubmitOutcome),
    Login { succeeded: bool },
    Acknowledged,
}

/// The single UI controller. Every user event arrives here and is handled to
/// completion before the next one.
pub struct AdminApp {
    initial_page: Page,
    layout: Layout,
    navigator: Navigator,
    charts: ChartRegistry,
    form: ScoreForm,
    login: LoginForm,
    session: SessionStore,
    api: Arc<dyn ScoreApi>,
    intake: IntakePipeline,
    screen: Screen,
}

impl AdminApp {
    pub fn new(
        api: Arc<dyn ScoreApi>,
        session: SessionStore,
        backend: Box<dyn ChartBackend>,
        analysis: Arc<dyn AnalysisProvider>,
        initial_page: Page,
        max_upload_size_mb: u64,
    ) -> Self {
        Self {
            initial_page,
            layout: Layout::default(),
            navigator: Navigator::new(initial_page),
            charts: ChartRegistry::new(backend),
            form: ScoreForm::new(),
            login: LoginForm::default(),
            session,
            api,
            intake: IntakePipeline::new(analysis, max_upload_size_mb),
            screen: Screen::default(),
        }
    }

    pub fn from_settings(
        settings: &Settings,
        api: Arc<dyn ScoreApi>,
        session: SessionStore,
        backend: Box<dyn ChartBackend>,
        analysis: Arc<dyn AnalysisProvider>,
    ) -> Self {
        Self::new(
            api,
            session,
            backend,
            analysis,
            settings.ui().initial_page,
            settings.intake().max_upload_size_mb,
        )
    }

    /// Uses `layout` to decide which optional targets exist.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self.screen = Screen::new(layout);
        self
    }

    /// Shows the initial page and runs its initialisation. The stored-session
    /// gate belongs to the student view, so it only applies when that view is
    /// the initial page.
    pub async fn startup(&mut self) {
        let page = self.initial_page;
        self.navigator.show(page);
        scores::calculate_total(&mut self.form, &mut self.charts);
        self.init_page(page).await;
        tracing::info!(page = %page, logged_in = self.session.is_logged_in(), "Dashboard ready");
    }

    /// Navigation click. Unknown ids change nothing.
    pub async fn activate(&mut self, page_id: &str) -> Option<Page> {
        let page = self.navigator.activate(page_id)?;
        self.init_page(page).await;
        Some(page)
    }

    async fn init_page(&mut self, page: Page) {
        let Some(init) = page.init() else {
            return;
        };

        match init {
            PageInit::Dashboard => {
                charts::init_dashboard_charts(&mut self.charts);
                let api = self.api.as_ref();
                dashboard::load_dashboard_data(api, &mut self.charts, &mut self.screen).await;
            }
            PageInit::Scores => {
                charts::init_score_charts(&mut self.charts);
                selection::load_class_options(&mut self.form, self.api.as_ref()).await;
            }
            PageInit::StudentView => {
                let restored = !self.screen.student.info_visible
                    && student_view::restore_student_session(
                        &self.session,
                        self.api.as_ref(),
                        &mut self.charts,
                        &mut self.screen,
                    )
                    .await;
                if !restored {
                    charts::init_student_charts(&mut self.charts);
                }
            }
        }
    }

    /// Form submission on the active page, dispatched by the handler the page
    /// registered when it was activated.
    pub async fn submit(&mut self) -> Submission {
        match self.navigator.submission_kind() {
            SubmissionKind::Score => Submission::Score(
                scores::handle_score_submit(
                    &mut self.form,
                    &mut self.charts,
                    self.api.as_ref(),
                    &mut self.screen,
                )
                .await,
            ),
            SubmissionKind::StudentLogin => {
                let succeeded = student_view::student_login(
                    &self.login,
                    &mut self.session,
                    self.api.as_ref(),
                    &mut self.charts,
                    &mut self.screen,
                )
                .await;
                Submission::Login { succeeded }
            }
            SubmissionKind::Upload => {
                self.screen.alert(UPLOAD_COMING_SOON);
                Submission::Acknowledged
            }
            SubmissionKind::Generic => {
                self.screen.alert(SAVED);
                Submission::Acknowledged
            }
        }
    }

    /// Manual edit of one sub-score; totals and radar follow immediately.
    pub fn set_score_input(&mut self, field: SubScoreField, value: impl Into<String>) {
        self.form.set_input(field, value);
        scores::calculate_total(&mut self.form, &mut self.charts);
    }

    pub async fn select_class(&mut self, class_id: &str) {
        selection::select_class(&mut self.form, self.api.as_ref(), class_id).await;
    }

    pub fn select_student(&mut self, student_id: &str) {
        self.form.student_id = student_id.to_string();
    }

    pub fn set_assignment(&mut self, name: &str, round: &str) {
        self.form.assignment_name = name.to_string();
        self.form.round = round.to_string();
    }

    pub fn set_feedback(&mut self, feedback: &str) {
        self.form.feedback = feedback.to_string();
    }

    pub fn set_login(&mut self, user_id: &str, password: &str) {
        self.login = LoginForm { user_id: user_id.to_string(), password: password.to_string() };
    }

    /// AI-assisted score extraction from an answer sheet.
    pub async fn upload_score_file(&mut self, file: &UploadFile) -> IntakeState {
        self.intake.process(file, &mut self.form, &mut self.charts, &mut self.screen).await
    }

    pub fn select_files(&mut self, files: &[UploadFile]) {
        self.screen.files = listing::list_files(files);
    }

    pub fn remove_file(&mut self, index: usize) -> Option<FileEntry> {
        listing::remove_file(&mut self.screen.files, index)
    }

    pub fn toggle_mobile_nav(&mut self) -> bool {
        self.navigator.toggle_mobile_nav()
    }

    /// Called once a burst of viewport changes has settled.
    pub fn resize_charts(&mut self) -> usize {
        self.charts.resize_all()
    }

    /// Clears the stored session and reloads from scratch.
    pub async fn logout(&mut self) {
        let reload = self.session.logout();
        self.reload(reload).await;
    }

    async fn reload(&mut self, _: Reload) {
        self.charts.destroy_all();
        self.form = ScoreForm::new();
        self.login = LoginForm::default();
        self.screen = Screen::new(self.layout);
        self.navigator = Navigator::new(self.initial_page);
        self.startup().await;
    }

    /// Expires timed banners and highlights.
    pub fn tick(&mut self) {
        self.screen.tick();
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn form(&self) -> &ScoreForm {
        &self.form
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn intake_state(&self) -> IntakeState {
        self.intake.state()
    }
}
