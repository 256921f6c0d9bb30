//! Page-load driver.
//!
//! Runs the two counter invocations for the current page: the site-wide
//! counter keyed by the host, and the per-page counter keyed by
//! `page/{host}{path}`. The invocations are independent and run
//! concurrently; no ordering holds between them.

use tracing::warn;

use crate::config::WidgetSection;
use crate::counter::VisitCounter;
use crate::page::PageEnv;

/// Outcome of one page load. `None` means the counter was skipped or its
/// update failed (the failure has already been logged).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLoadSummary {
    pub site: Option<u64>,
    pub page: Option<u64>,
}

/// Run both counter invocations for the current page.
///
/// Failures never propagate: each one degrades to a `warn!` log and a
/// `None` in the summary, and the other counter proceeds regardless.
pub async fn run_page_load(
    env: &dyn PageEnv,
    counter: &VisitCounter,
    widget: &WidgetSection,
) -> PageLoadSummary {
    let host = env.host().to_string();
    let current = format!("{}{}", host, env.path());

    let site_fut = async {
        let targets = env.select(&widget.site_selector);
        match counter.record_visit(&host, &targets).await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "site counter update failed");
                None
            }
        }
    };

    let page_fut = async {
        // Degenerate current-URL strings never get a per-page counter.
        if current.is_empty() || current == "_" {
            return None;
        }
        let targets = env.select(&widget.page_selector);
        match counter.record_visit(&format!("page/{current}"), &targets).await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "page counter update failed");
                None
            }
        }
    };

    let (site, page) = futures_util::join!(site_fut, page_fut);
    PageLoadSummary { site, page }
}
