use validator::Validate;

use crate::api::ScoreApi;
use crate::charts::{self, ChartRegistry};
use crate::core::time;
use crate::schemas::{
    format_number, LoginForm, ScoreRecord, SessionUser, Student, SUB_SCORE_LABELS, SUB_SCORE_MAXIMA,
};
use crate::screen::Screen;
use crate::session::SessionStore;

pub const ENTER_CREDENTIALS: &str = "학생 번호와 비밀번호를 입력하세요";
pub const LOGIN_REJECTED: &str = "로그인 실패";
pub const LOGIN_FAILED: &str = "로그인 중 오류가 발생했습니다";

#[derive(Debug, Clone, PartialEq)]
pub struct StudentPanel {
    pub login_visible: bool,
    pub info_visible: bool,
    pub profile: Option<StudentProfile>,
    pub scores: Vec<ScoreListItem>,
}

impl Default for StudentPanel {
    fn default() -> Self {
        Self { login_visible: true, info_visible: false, profile: None, scores: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub name: String,
    pub subtitle: String,
    /// Left as previously rendered when the student has no records yet.
    pub stats: Option<ProfileStats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStats {
    pub average: String,
    pub best: String,
    pub count: String,
    pub latest_grade: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreListItem {
    pub title: String,
    pub date: String,
    pub details: Vec<(String, String)>,
    pub total: String,
    pub grade: String,
    pub badge_class: String,
    pub feedback_lines: Vec<String>,
    pub attachment_url: Option<String>,
}

/// Records are expected newest first; the latest grade is the first entry's.
pub fn profile_stats(scores: &[ScoreRecord]) -> Option<ProfileStats> {
    let latest = scores.first()?;
    let sum: f64 = scores.iter().map(|record| record.total_score).sum();
    let best = scores.iter().map(|record| record.total_score).fold(f64::MIN, f64::max);

    Some(ProfileStats {
        average: format!("{:.1}점", sum / scores.len() as f64),
        best: format!("{}점", format_number(best)),
        count: format!("{}회", scores.len()),
        latest_grade: latest.grade.to_string(),
    })
}

pub fn profile(student: &Student, scores: &[ScoreRecord]) -> StudentProfile {
    StudentProfile {
        name: student.name.clone(),
        subtitle: format!("{} | 학생번호: {}", student.class_id, student.user_id),
        stats: profile_stats(scores),
    }
}

pub fn score_list_item(record: &ScoreRecord) -> ScoreListItem {
    let date = time::parse_timestamp(&record.written_date)
        .map(time::format_korean_date)
        .unwrap_or_else(|| record.written_date.clone());
    let details = SUB_SCORE_LABELS
        .iter()
        .zip(record.scores.as_array())
        .zip(SUB_SCORE_MAXIMA)
        .map(|((label, value), max)| {
            (format!("{label}:"), format!("{}/{}", format_number(value), format_number(max)))
        })
        .collect();

    ScoreListItem {
        title: format!("{} ({}회차)", record.assignment_name, record.round),
        date,
        details,
        total: format!("{}점", format_number(record.total_score)),
        grade: record.grade.to_string(),
        badge_class: format!("grade-badge {}", record.grade.letter_class()),
        feedback_lines: record.feedback.split('\n').map(str::to_string).collect(),
        attachment_url: record.attachment_url.clone().filter(|url| !url.is_empty()),
    }
}

/// Loads the student and their records; the panel changes only when both
/// calls succeed.
pub async fn load_student_data(api: &dyn ScoreApi, student_id: &str, screen: &mut Screen) {
    let loaded = async {
        let student = api.student(student_id).await?;
        let scores = api.scores(Some(student_id)).await?;
        Ok::<_, crate::api::ApiError>((student, scores))
    }
    .await;

    match loaded {
        Ok((student, scores)) => {
            screen.student.profile = Some(profile(&student, &scores));
            screen.student.scores = scores.iter().map(score_list_item).collect();
        }
        Err(err) => tracing::error!(error = %err, student_id, "Failed to load student data"),
    }
}

async fn reveal_student(
    user: &SessionUser,
    api: &dyn ScoreApi,
    charts: &mut ChartRegistry,
    screen: &mut Screen,
) {
    if !screen.layout().student_panel {
        return;
    }
    screen.student.login_visible = false;
    screen.student.info_visible = true;
    load_student_data(api, &user.user_id, screen).await;
    charts::init_student_charts(charts);
}

pub async fn student_login(
    form: &LoginForm,
    session: &mut SessionStore,
    api: &dyn ScoreApi,
    charts: &mut ChartRegistry,
    screen: &mut Screen,
) -> bool {
    if form.validate().is_err() {
        screen.alert(ENTER_CREDENTIALS);
        return false;
    }

    screen.set_loading(true);
    let result = api.login(&form.user_id, &form.password).await;
    screen.set_loading(false);

    match result {
        Ok(grant) => {
            tracing::info!(user_id = %grant.user.user_id, role = ?grant.user.role, "Logged in");
            session.set_token(&grant.token);
            session.set_user(&grant.user);
            reveal_student(&grant.user, api, charts, screen).await;
            true
        }
        Err(err) if err.is_rejection() => {
            screen.alert(err.rejection_message().unwrap_or(LOGIN_REJECTED));
            false
        }
        Err(err) => {
            tracing::error!(error = %err, "Login failed");
            screen.alert(LOGIN_FAILED);
            false
        }
    }
}

/// Shows a stored student session without asking for credentials again.
/// Staff sessions and anonymous visitors get the login card.
pub async fn restore_student_session(
    session: &SessionStore,
    api: &dyn ScoreApi,
    charts: &mut ChartRegistry,
    screen: &mut Screen,
) -> bool {
    if !session.is_logged_in() {
        return false;
    }
    let Some(user) = session.user().filter(SessionUser::is_student) else {
        return false;
    };

    tracing::debug!(user_id = %user.user_id, "Restoring stored student session");
    reveal_student(&user, api, charts, screen).await;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartId;
    use crate::schemas::{Role, SubScores};
    use crate::scores::Grade;
    use crate::test_support::{self, FakeApi, RecordingBackend};

    fn record(total: [f64; 5], grade: Grade) -> ScoreRecord {
        let scores = SubScores::from_array(total);
        ScoreRecord {
            score_id: None,
            student_id: "s0007".to_string(),
            class_id: "korea-1".to_string(),
            assignment_name: "논술 과제".to_string(),
            round: 2,
            written_date: "2025-03-07T09:05:30.000Z".to_string(),
            total_score: scores.total(),
            scores,
            grade,
            feedback: "첫째 줄\n둘째 줄".to_string(),
            attachment_url: None,
        }
    }

    fn credentials(user_id: &str, password: &str) -> LoginForm {
        LoginForm { user_id: user_id.to_string(), password: password.to_string() }
    }

    #[test]
    fn profile_stats_summarise_records() {
        let scores = [
            record([18.0, 27.0, 18.0, 17.0, 9.0], Grade::BPlus),
            record([20.0, 30.0, 20.0, 20.0, 10.0], Grade::APlus),
            record([14.0, 20.0, 14.0, 14.0, 7.0], Grade::D),
        ];

        let stats = profile_stats(&scores).expect("stats");

        assert_eq!(stats.average, "86.0점");
        assert_eq!(stats.best, "100점");
        assert_eq!(stats.count, "3회");
        assert_eq!(stats.latest_grade, "B+");
        assert!(profile_stats(&[]).is_none());
    }

    #[test]
    fn list_item_renders_every_part() {
        let mut entry = record([18.0, 27.0, 18.0, 17.0, 9.0], Grade::BPlus);
        entry.attachment_url = Some("https://files.example.com/a.pdf".to_string());

        let item = score_list_item(&entry);

        assert_eq!(item.title, "논술 과제 (2회차)");
        assert_eq!(item.date, "2025. 3. 7.");
        assert_eq!(item.details[1], ("내용 이해력:".to_string(), "27/30".to_string()));
        assert_eq!(item.total, "89점");
        assert_eq!(item.badge_class, "grade-badge grade-b");
        assert_eq!(item.feedback_lines, vec!["첫째 줄", "둘째 줄"]);
        assert!(item.attachment_url.is_some());
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_the_service() {
        let api = FakeApi::new();
        let mut session = SessionStore::in_memory();
        let mut charts = ChartRegistry::new(Box::new(RecordingBackend::new()));
        let mut screen = Screen::default();

        let form = credentials("s0007", "");
        let ok = student_login(&form, &mut session, &api, &mut charts, &mut screen).await;

        assert!(!ok);
        assert_eq!(api.logins(), 0);
        assert_eq!(screen.last_alert(), Some(ENTER_CREDENTIALS));
    }

    #[tokio::test]
    async fn login_persists_session_and_shows_student() {
        let api = FakeApi::new();
        let mut session = SessionStore::in_memory();
        let mut charts = ChartRegistry::new(Box::new(RecordingBackend::new()));
        let mut screen = Screen::default();

        let ok = student_login(
            &credentials(test_support::STUDENT_ID, test_support::STUDENT_PASSWORD),
            &mut session,
            &api,
            &mut charts,
            &mut screen,
        )
        .await;

        assert!(ok);
        assert!(session.is_logged_in());
        assert_eq!(session.user().map(|user| user.role), Some(Role::Student));
        assert!(!screen.student.login_visible);
        assert!(screen.student.info_visible);
        let profile = screen.student.profile.as_ref().expect("profile");
        assert!(profile.subtitle.ends_with(&format!("학생번호: {}", test_support::STUDENT_ID)));
        assert!(!screen.student.scores.is_empty());
        assert!(charts.is_live(ChartId::StudentTrend));
    }

    #[tokio::test]
    async fn wrong_password_shows_service_message() {
        let api = FakeApi::new();
        let mut session = SessionStore::in_memory();
        let mut charts = ChartRegistry::new(Box::new(RecordingBackend::new()));
        let mut screen = Screen::default();

        let ok = student_login(
            &credentials(test_support::STUDENT_ID, "wrong"),
            &mut session,
            &api,
            &mut charts,
            &mut screen,
        )
        .await;

        assert!(!ok);
        assert!(!session.is_logged_in());
        assert_eq!(screen.last_alert(), Some(test_support::WRONG_PASSWORD));
        assert!(screen.student.login_visible);
    }

    #[tokio::test]
    async fn stored_staff_session_is_not_restored() {
        let api = FakeApi::new();
        let mut session = SessionStore::in_memory();
        session.set_token("tok-staff");
        session.set_user(&SessionUser {
            user_id: "t01".to_string(),
            role: Role::Staff,
            class_id: None,
        });
        let mut charts = ChartRegistry::new(Box::new(RecordingBackend::new()));
        let mut screen = Screen::default();

        assert!(!restore_student_session(&session, &api, &mut charts, &mut screen).await);
        assert!(screen.student.login_visible);
    }

    #[tokio::test]
    async fn stored_student_session_skips_login() {
        let api = FakeApi::new();
        let mut session = SessionStore::in_memory();
        session.set_token("tok-student");
        session.set_user(&test_support::student_user());
        let mut charts = ChartRegistry::new(Box::new(RecordingBackend::new()));
        let mut screen = Screen::default();

        assert!(restore_student_session(&session, &api, &mut charts, &mut screen).await);
        assert!(screen.student.info_visible);
        assert_eq!(api.logins(), 0);
    }
}
