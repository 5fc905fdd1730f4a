#![forbid(unsafe_code)]

//! Viewer URL construction.

use crate::params::ToolbarMode;

/// Build the embeddable viewer URL for one workbook view.
///
/// One trailing slash is stripped from `server`; `workbook` and `view` are
/// percent-encoded as single path segments. No validation is performed, so
/// malformed input yields a syntactically well-formed but useless URL.
#[must_use]
pub fn build_view_url(
    server: &str,
    workbook: &str,
    view: &str,
    toolbar: Option<ToolbarMode>,
) -> String {
    let base = server.strip_suffix('/').unwrap_or(server);
    let mut url = format!(
        "{base}/views/{}/{}?:embed=y&:showVizHome=no",
        urlencoding::encode(workbook),
        urlencoding::encode(view),
    );
    if let Some(mode) = toolbar {
        url.push_str("&:toolbar=");
        url.push_str(mode.as_str());
    }
    url
}
