// ── Transient messages ──
//
// Each screen shows at most one success and one error message. A banner
// may carry a deadline; once it passes, the banner reads as absent.
// Deadlines use tokio's clock so paused-time tests can step past them.

use std::time::Duration;

use tokio::time::Instant;

/// Public contact/demo forms clear their messages after 5 s.
pub const FORM_BANNER_TTL: Duration = Duration::from_secs(5);
/// Status-change messages on the inbox screens clear after 8 s.
pub const STATUS_BANNER_TTL: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    message: String,
    deadline: Option<Instant>,
}

impl Banner {
    pub fn new(message: impl Into<String>, ttl: Option<Duration>) -> Self {
        Self {
            message: message.into(),
            deadline: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_live(&self) -> bool {
        self.deadline.is_none_or(|deadline| Instant::now() < deadline)
    }
}

/// The success/error pair a screen carries.
#[derive(Debug, Clone, Default)]
pub struct Banners {
    success: Option<Banner>,
    error: Option<Banner>,
}

impl Banners {
    /// Drop both messages (done before every operation).
    pub fn clear(&mut self) {
        self.success = None;
        self.error = None;
    }

    pub fn show_success(&mut self, message: impl Into<String>, ttl: Option<Duration>) {
        self.error = None;
        self.success = Some(Banner::new(message, ttl));
    }

    pub fn show_error(&mut self, message: impl Into<String>, ttl: Option<Duration>) {
        self.success = None;
        self.error = Some(Banner::new(message, ttl));
    }

    pub fn success(&self) -> Option<&str> {
        self.success
            .as_ref()
            .filter(|b| b.is_live())
            .map(Banner::message)
    }

    pub fn error(&self) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|b| b.is_live())
            .map(Banner::message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn banner_expires_after_deadline() {
        let mut banners = Banners::default();
        banners.show_success("状态已成功更新为: 已联系", Some(STATUS_BANNER_TTL));
        assert_eq!(banners.success(), Some("状态已成功更新为: 已联系"));

        tokio::time::advance(Duration::from_millis(7_999)).await;
        assert!(banners.success().is_some());

        tokio::time::advance(Duration::from_millis(2)).await;
        assert_eq!(banners.success(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn sticky_banner_never_expires() {
        let mut banners = Banners::default();
        banners.show_error("保存失败: boom", None);
        tokio::time::advance(Duration::from_secs(3600)).await;
        assert_eq!(banners.error(), Some("保存失败: boom"));
    }

    #[test]
    fn showing_one_kind_replaces_the_other() {
        let mut banners = Banners::default();
        banners.show_error("x", None);
        banners.show_success("y", None);
        assert_eq!(banners.error(), None);
        assert_eq!(banners.success(), Some("y"));
        banners.clear();
        assert_eq!(banners.success(), None);
    }
}
