use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Page {
    Dashboard,
    Classes,
    Students,
    Scores,
    Upload,
    StudentView,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Classes,
        Page::Students,
        Page::Scores,
        Page::Upload,
        Page::StudentView,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Classes => "classes",
            Page::Students => "students",
            Page::Scores => "scores",
            Page::Upload => "upload",
            Page::StudentView => "student-view",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Page::ALL.into_iter().find(|page| page.id() == id)
    }

    /// What a form submission on this page means.
    pub fn submission_kind(self) -> SubmissionKind {
        match self {
            Page::Scores => SubmissionKind::Score,
            Page::Upload => SubmissionKind::Upload,
            Page::StudentView => SubmissionKind::StudentLogin,
            Page::Dashboard | Page::Classes | Page::Students => SubmissionKind::Generic,
        }
    }

    /// Initialisation that must run every time the page becomes visible.
    pub fn init(self) -> Option<PageInit> {
        match self {
            Page::Dashboard => Some(PageInit::Dashboard),
            Page::Scores => Some(PageInit::Scores),
            Page::StudentView => Some(PageInit::StudentView),
            Page::Classes | Page::Students | Page::Upload => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Score,
    Upload,
    StudentLogin,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageInit {
    /// Class bar chart plus a one-off stats fetch.
    Dashboard,
    /// Radar and trend charts plus the class/student selects.
    Scores,
    /// Student trend chart plus the stored-session gate.
    StudentView,
}

/// Visibility of the panels and nav highlights, plus the submission handler
/// registered by whichever page was activated last. Exactly one panel and one
/// highlight are active at any time.
#[derive(Debug, Clone)]
pub struct Navigator {
    active: Page,
    highlighted: Page,
    submission: SubmissionKind,
    mobile_open: bool,
}

impl Navigator {
    pub fn new(initial: Page) -> Self {
        Self {
            active: initial,
            highlighted: initial,
            submission: initial.submission_kind(),
            mobile_open: false,
        }
    }

    pub fn active(&self) -> Page {
        self.active
    }

    pub fn is_visible(&self, page: Page) -> bool {
        self.active == page
    }

    pub fn is_highlighted(&self, page: Page) -> bool {
        self.highlighted == page
    }

    pub fn submission_kind(&self) -> SubmissionKind {
        self.submission
    }

    /// Switches to the page named `id`. Unknown ids leave everything as it
    /// was and return `None`; otherwise the returned page tells the caller
    /// which initialisation, if any, to run.
    pub fn activate(&mut self, id: &str) -> Option<Page> {
        let Some(page) = Page::from_id(id) else {
            tracing::debug!(page_id = id, "Ignoring activation of unknown page");
            return None;
        };

        self.show(page);
        Some(page)
    }

    pub fn show(&mut self, page: Page) {
        self.active = page;
        self.highlighted = page;
        self.submission = page.submission_kind();
        tracing::debug!(page = %page, "Page activated");
    }

    pub fn visible_panels(&self) -> Vec<Page> {
        Page::ALL.into_iter().filter(|page| self.is_visible(*page)).collect()
    }

    pub fn highlighted_links(&self) -> Vec<Page> {
        Page::ALL.into_iter().filter(|page| self.is_highlighted(*page)).collect()
    }

    pub fn toggle_mobile_nav(&mut self) -> bool {
        self.mobile_open = !self.mobile_open;
        self.mobile_open
    }

    pub fn is_mobile_nav_open(&self) -> bool {
        self.mobile_open
    }
}
