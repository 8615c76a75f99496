//! Best-effort reveal of additional listings before extraction.

use std::time::Duration;
use tracing::debug;

use super::session::BrowserSession;
use crate::config::PaginationConfig;
use crate::error::ScrapeResult;

/// How expansion ended. Informational only; expansion never fails a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionOutcome {
    /// No control on the page, scrolled once for lazy loading
    Scrolled,
    /// Control activated `clicks` times until it vanished or attempts ran out
    Clicked { clicks: usize },
    /// A control exists but is hidden or disabled
    NotActionable { clicks: usize },
    /// An internal error ended expansion early; treated as "no more content"
    Aborted { clicks: usize, reason: String },
}

/// Click "load more" style controls up to `max_attempts` times, or scroll once
/// when no control exists.
pub async fn expand(session: &dyn BrowserSession, config: &PaginationConfig) -> ExpansionOutcome {
    let mut clicks = 0;
    match run(session, config, &mut clicks).await {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!(clicks, error = %e, "Could not load more listings");
            ExpansionOutcome::Aborted { clicks, reason: e.to_string() }
        }
    }
}

async fn run(
    session: &dyn BrowserSession,
    config: &PaginationConfig,
    clicks: &mut usize,
) -> ScrapeResult<ExpansionOutcome> {
    let pause = Duration::from_millis(config.pause_ms);
    let mut control = session.find_control(&config.button_labels).await?;

    if control.is_none() {
        debug!("No load-more control found, scrolling for lazy-loaded content");
        session.scroll_to_bottom().await?;
        tokio::time::sleep(pause).await;
        return Ok(ExpansionOutcome::Scrolled);
    }

    while *clicks < config.max_attempts {
        let current = match control.as_ref() {
            Some(current) => current,
            None => break,
        };

        if !current.is_actionable().await? {
            return Ok(ExpansionOutcome::NotActionable { clicks: *clicks });
        }

        current.activate().await?;
        *clicks += 1;
        debug!(clicks = *clicks, "Activated load-more control");

        tokio::time::sleep(pause).await;
        control = session.find_control(&config.button_labels).await?;
    }

    Ok(ExpansionOutcome::Clicked { clicks: *clicks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::scraper::session::{ListingElement, PageControl, SessionLauncher};
    use crate::scraper::static_page::StaticLauncher;
    use async_trait::async_trait;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Page whose load-more button disappears after `remaining` clicks
    struct ScriptedPage {
        remaining: Rc<Cell<usize>>,
        clicks: Rc<Cell<usize>>,
        scrolls: Cell<usize>,
        actionable: bool,
        fail_lookup: bool,
    }

    impl ScriptedPage {
        fn new(remaining: usize) -> Self {
            Self {
                remaining: Rc::new(Cell::new(remaining)),
                clicks: Rc::new(Cell::new(0)),
                scrolls: Cell::new(0),
                actionable: true,
                fail_lookup: false,
            }
        }
    }

    struct ScriptedButton {
        remaining: Rc<Cell<usize>>,
        clicks: Rc<Cell<usize>>,
        actionable: bool,
    }

    #[async_trait(?Send)]
    impl PageControl for ScriptedButton {
        async fn is_actionable(&self) -> ScrapeResult<bool> {
            Ok(self.actionable)
        }

        async fn activate(&self) -> ScrapeResult<()> {
            self.clicks.set(self.clicks.get() + 1);
            self.remaining.set(self.remaining.get().saturating_sub(1));
            Ok(())
        }
    }

    #[async_trait(?Send)]
    impl BrowserSession for ScriptedPage {
        async fn navigate(&mut self, _url: &str) -> ScrapeResult<()> {
            Ok(())
        }

        async fn wait_for(&self, _selector: &str, _timeout: Duration) -> ScrapeResult<()> {
            Ok(())
        }

        async fn query_all(&self, _selector: &str) -> ScrapeResult<Vec<Box<dyn ListingElement>>> {
            Ok(Vec::new())
        }

        async fn find_control(&self, _labels: &[String]) -> ScrapeResult<Option<Box<dyn PageControl>>> {
            if self.fail_lookup {
                return Err(ScrapeError::StaleElement);
            }
            if self.remaining.get() == 0 {
                return Ok(None);
            }
            Ok(Some(Box::new(ScriptedButton {
                remaining: self.remaining.clone(),
                clicks: self.clicks.clone(),
                actionable: self.actionable,
            })))
        }

        async fn scroll_to_bottom(&self) -> ScrapeResult<()> {
            self.scrolls.set(self.scrolls.get() + 1);
            Ok(())
        }

        async fn close(self: Box<Self>) -> ScrapeResult<()> {
            Ok(())
        }
    }

    fn fast_config() -> PaginationConfig {
        PaginationConfig { pause_ms: 0, ..PaginationConfig::default() }
    }

    #[tokio::test]
    async fn test_scrolls_once_when_no_control() {
        let page = ScriptedPage::new(0);
        let outcome = expand(&page, &fast_config()).await;

        assert_eq!(outcome, ExpansionOutcome::Scrolled);
        assert_eq!(page.scrolls.get(), 1);
        assert_eq!(page.clicks.get(), 0);
    }

    #[tokio::test]
    async fn test_clicks_are_bounded_by_max_attempts() {
        let page = ScriptedPage::new(100);
        let outcome = expand(&page, &fast_config()).await;

        assert_eq!(outcome, ExpansionOutcome::Clicked { clicks: 3 });
        assert_eq!(page.clicks.get(), 3);
        assert_eq!(page.scrolls.get(), 0);
    }

    #[tokio::test]
    async fn test_stops_when_control_disappears() {
        let page = ScriptedPage::new(1);
        let outcome = expand(&page, &fast_config()).await;

        assert_eq!(outcome, ExpansionOutcome::Clicked { clicks: 1 });
        assert_eq!(page.scrolls.get(), 0);
    }

    #[tokio::test]
    async fn test_disabled_control_is_not_clicked() {
        let mut page = ScriptedPage::new(5);
        page.actionable = false;
        let outcome = expand(&page, &fast_config()).await;

        assert_eq!(outcome, ExpansionOutcome::NotActionable { clicks: 0 });
        assert_eq!(page.clicks.get(), 0);
    }

    #[tokio::test]
    async fn test_lookup_errors_are_swallowed() {
        let mut page = ScriptedPage::new(5);
        page.fail_lookup = true;
        let outcome = expand(&page, &fast_config()).await;

        assert!(matches!(outcome, ExpansionOutcome::Aborted { clicks: 0, .. }));
    }

    #[tokio::test]
    async fn test_static_page_click_is_treated_as_no_more_content() {
        let html = "<html><body><div class='job-listing'></div><button>Show more jobs</button></body></html>";
        let mut session = StaticLauncher::inline(html).open().await.unwrap();
        session.navigate("https://example.com/jobs").await.unwrap();

        let outcome = expand(session.as_ref(), &fast_config()).await;
        assert!(matches!(outcome, ExpansionOutcome::Aborted { clicks: 0, .. }));
    }
}
