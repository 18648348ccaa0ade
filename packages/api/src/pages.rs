// ABOUTME: Chapter page rendering
// ABOUTME: Wraps fixed HTML page bodies in the shared site header and footer

use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::cache::PageCache;
use crate::error::{ApiResult, AppError};

pub const INDEX_PAGE: &str = "chapter1_introduction";

/// Every page the site will render
pub const PAGES: &[&str] = &[
    "chapter1_introduction",
    "chapter2_the_basics",
    "chapter3_crash_course",
    "chapter4_interactive_prompt",
    "chapter5_introducing_mpc",
    "chapter6_parsing",
    "chapter7_evaluation",
    "chapter8_error_handling",
    "chapter9_into_lisp",
    "chapter10_variables",
    "chapter11_functions",
    "chapter12_conditionals",
    "chapter13_strings",
    "chapter14_standard_library",
    "chapter15_future_work",
    "contents",
    "purchased",
    "invalid",
];

pub const HEADER: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Build your own Lisp</title>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link href="/static/css/bootstrap.css" rel="stylesheet">
    <link href="/static/css/github.css" rel="stylesheet">
  </head>
  <body style="background: url(/static/img/tiletop.png) repeat-x;">

    <div style='margin:100px;width:800px;margin-left:auto;margin-right:auto;'>

"#;

pub const FOOTER: &str = r#"

    </div>

    <script src="https://code.jquery.com/jquery.js"></script>
    <script src="/static/js/bootstrap.min.js"></script>
    <script src="/static/js/rainbow.min.js"></script>
  </body>
</html>
"#;

pub fn is_known_page(page: &str) -> bool {
    PAGES.contains(&page)
}

pub struct PageRenderer {
    pages_dir: PathBuf,
    cache: Arc<dyn PageCache>,
}

impl PageRenderer {
    pub fn new(pages_dir: impl Into<PathBuf>, cache: Arc<dyn PageCache>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
            cache,
        }
    }

    /// Rendered HTML for `page`, or `None` when the page is not part of the site
    pub async fn render(&self, page: &str) -> ApiResult<Option<String>> {
        if !is_known_page(page) {
            return Ok(None);
        }

        if let Some(html) = self.cache.get(page) {
            debug!(page = %page, "Page cache hit");
            return Ok(Some(html));
        }

        let path = self.pages_dir.join(format!("{}.html", page));
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Listed page has no file on disk");
                return Err(AppError::not_found());
            }
            Err(e) => return Err(AppError::internal(e)),
        };

        let html = format!("{}{}{}", HEADER, contents, FOOTER);
        self.cache.set(page, html.clone());
        Ok(Some(html))
    }
}
