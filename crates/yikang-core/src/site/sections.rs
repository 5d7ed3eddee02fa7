// Public site sections that load data: the cases showcase, the news
// list, and the contact/demo panel.

use tracing::error;

use super::{ContactForm, DemoRequestForm, SECTION_LIMIT, SiteData};
use crate::banner::{Banners, FORM_BANNER_TTL};
use crate::error::CoreError;
use crate::model::{News, ProductCase};

const SUBMIT_FALLBACK_MESSAGE: &str = "提交失败，请稍后重试";

/// What a list-backed section renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionState<T> {
    Loading,
    /// Nothing to show; the section renders its call-to-action instead.
    Empty,
    Ready(Vec<T>),
}

impl<T> SectionState<T> {
    /// Fetch errors are logged and render as empty.
    fn settle(result: Result<Vec<T>, CoreError>, what: &str) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Ready(items),
            Err(e) => {
                error!(error = %e, "error fetching {what}");
                Self::Empty
            }
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready(items) => items,
            _ => &[],
        }
    }
}

// ── Cases ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CasesSection {
    state: SectionState<ProductCase>,
}

impl Default for CasesSection {
    fn default() -> Self {
        Self {
            state: SectionState::Loading,
        }
    }
}

impl CasesSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, site: &SiteData) {
        self.state = SectionState::Loading;
        let result = site.get_product_cases(Some(SECTION_LIMIT)).await;
        self.state = SectionState::settle(result, "cases");
    }

    pub fn state(&self) -> &SectionState<ProductCase> {
        &self.state
    }
}

// ── News ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct NewsSection {
    state: SectionState<News>,
    show_all: bool,
}

impl Default for NewsSection {
    fn default() -> Self {
        Self {
            state: SectionState::Loading,
            show_all: false,
        }
    }
}

impl NewsSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, site: &SiteData) {
        self.state = SectionState::Loading;
        let limit = if self.show_all {
            None
        } else {
            Some(SECTION_LIMIT)
        };
        let result = site.get_news(limit).await;
        self.state = SectionState::settle(result, "news");
    }

    /// Switch between the latest three and everything, then refetch.
    pub async fn set_show_all(&mut self, site: &SiteData, show_all: bool) {
        self.show_all = show_all;
        self.load(site).await;
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn state(&self) -> &SectionState<News> {
        &self.state
    }
}

// ── Contact panel ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactTab {
    #[default]
    Contact,
    Demo,
}

/// The two public forms plus their shared submit state and messages.
#[derive(Debug, Default)]
pub struct ContactSection {
    pub tab: ContactTab,
    pub contact: ContactForm,
    pub demo: DemoRequestForm,
    submitting: bool,
    banners: Banners,
}

impl ContactSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn switch_tab(&mut self, tab: ContactTab) {
        self.tab = tab;
        self.banners.clear();
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    /// Submit the form on the active tab. On success the form is reset.
    pub async fn submit(&mut self, site: &SiteData) -> Result<(), CoreError> {
        if self.submitting {
            return Err(CoreError::Busy);
        }
        self.submitting = true;
        self.banners.clear();

        let result = match self.tab {
            ContactTab::Contact => site.submit_contact(&self.contact).await,
            ContactTab::Demo => site.submit_demo_request(&self.demo).await,
        };
        self.submitting = false;

        match result {
            Ok(receipt) => {
                self.banners
                    .show_success(receipt.message, Some(FORM_BANNER_TTL));
                match self.tab {
                    ContactTab::Contact => self.contact = ContactForm::default(),
                    ContactTab::Demo => self.demo = DemoRequestForm::default(),
                }
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                let message = if message.is_empty() {
                    SUBMIT_FALLBACK_MESSAGE.to_owned()
                } else {
                    message
                };
                self.banners.show_error(message, Some(FORM_BANNER_TTL));
                Err(e)
            }
        }
    }
}
