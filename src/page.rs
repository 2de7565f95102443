//! Page glue that rides along with the backdrop: the stale-article note and
//! the htmx navigation fallback.

const MS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;
const DAYS_PER_YEAR: i64 = 365;

pub const DATE_SELECTOR: &str = "p.date";
pub const DATE_ATTRIBUTE: &str = "data-date";
pub const WARNING_CLASS: &str = "date-warning";
pub const WARNING_SEPARATOR: &str = " \u{2014} ";

/// Delay before resetting scroll after a partial page swap.
pub const SCROLL_RESET_DELAY_MS: i32 = 50;

/// Note shown on articles at least a year old, `None` for anything newer.
pub fn staleness_notice(published_ms: f64, now_ms: f64) -> Option<String> {
    if !published_ms.is_finite() || !now_ms.is_finite() {
        return None;
    }
    let days = ((now_ms - published_ms) / MS_PER_DAY).floor() as i64;
    if days < DAYS_PER_YEAR {
        return None;
    }
    let years = days / DAYS_PER_YEAR;
    let plural = if years == 1 { "" } else { "s" };
    Some(format!("this article is {years} year{plural} old."))
}

/// htmx failures that fall back to a full page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationFailure {
    /// Offline, DNS failure and the like.
    Send,
    /// Response could not be swapped into the page.
    Swap,
    /// 4xx/5xx response.
    Response,
}

impl NavigationFailure {
    pub const ALL: [NavigationFailure; 3] = [
        NavigationFailure::Send,
        NavigationFailure::Swap,
        NavigationFailure::Response,
    ];

    pub fn event_name(self) -> &'static str {
        match self {
            NavigationFailure::Send => "htmx:sendError",
            NavigationFailure::Swap => "htmx:swapError",
            NavigationFailure::Response => "htmx:responseError",
        }
    }
}

pub const AFTER_SETTLE_EVENT: &str = "htmx:afterSettle";

/// URL to load natively after a failed partial navigation.
///
/// Prefers the request path htmx resolved, then the configured path.
pub fn fallback_target(request_path: Option<String>, config_path: Option<String>) -> Option<String> {
    request_path
        .filter(|p| !p.is_empty())
        .or_else(|| config_path.filter(|p| !p.is_empty()))
}
