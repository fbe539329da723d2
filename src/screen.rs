//! The rendered state of every view the controller drives. An embedding front
//! end draws this; nothing here knows about a particular toolkit.

use std::time::Duration;

use tokio::time::Instant;

use crate::intake::listing::FileEntry;
use crate::student_view::StudentPanel;

/// How long the extraction success banner stays up.
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Success,
}

/// A blocking message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Loading,
    Success,
    Error,
}

impl BannerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BannerKind::Loading => "loading",
            BannerKind::Success => "success",
            BannerKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    expires_at: Option<Instant>,
}

impl Banner {
    pub fn class_name(&self) -> String {
        format!("upload-status {}", self.kind.as_str())
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Which optional targets the current markup provides. Writes aimed at a
/// missing target are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub stat_cards: usize,
    pub upload_status: bool,
    pub student_panel: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self { stat_cards: 4, upload_status: true, student_panel: true }
    }
}

#[derive(Debug, Clone)]
pub struct Screen {
    layout: Layout,
    alerts: Vec<Alert>,
    loading: bool,
    stat_cards: Vec<String>,
    upload_status: Option<Banner>,
    pub student: StudentPanel,
    pub files: Vec<FileEntry>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

impl Screen {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            alerts: Vec::new(),
            loading: false,
            stat_cards: vec![String::new(); layout.stat_cards],
            upload_status: None,
            student: StudentPanel::default(),
            files: Vec::new(),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.push_alert(AlertLevel::Info, message.into());
    }

    pub fn alert_success(&mut self, message: impl Into<String>) {
        self.push_alert(AlertLevel::Success, message.into());
    }

    fn push_alert(&mut self, level: AlertLevel, message: String) {
        tracing::debug!(?level, %message, "Alert raised");
        self.alerts.push(Alert { level, message });
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(|alert| alert.message.as_str())
    }

    /// Hands the pending alerts to the front end.
    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Writes `text` into the card at `index` if that card exists.
    pub fn set_stat_card(&mut self, index: usize, text: String) -> bool {
        match self.stat_cards.get_mut(index) {
            Some(slot) => {
                *slot = text;
                true
            }
            None => false,
        }
    }

    pub fn stat_cards(&self) -> &[String] {
        &self.stat_cards
    }

    pub fn show_upload_status(
        &mut self,
        kind: BannerKind,
        message: impl Into<String>,
        ttl: Option<Duration>,
    ) {
        if !self.layout.upload_status {
            return;
        }
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.upload_status = Some(Banner { kind, message: message.into(), expires_at });
    }

    /// The current banner, if any and not yet expired.
    pub fn upload_status(&self) -> Option<&Banner> {
        let now = Instant::now();
        self.upload_status.as_ref().filter(|banner| !banner.is_expired(now))
    }

    /// Drops expired timed effects.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if self.upload_status.as_ref().is_some_and(|banner| banner.is_expired(now)) {
            self.upload_status = None;
        }
    }
}
