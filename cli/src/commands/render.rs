//! Render the people board page.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use people_business::page::{TABLE_HEADERS, skeleton};
use people_business::{FetchService, LoaderConfig, Page, ReqwestFetcher};
use people_dom::SharedDocument;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::instrument;

use crate::cli::RenderFormat;
use crate::output::Output;

/// Mount the page, run the startup load and print the result.
#[instrument(skip_all, name = "render", fields(format = ?format, url = %config.users_url()))]
pub async fn run_render(config: LoaderConfig, format: RenderFormat) -> Result<()> {
    let out = Output::new();
    let page = mount_page(config, Arc::new(ReqwestFetcher::default()))?;
    page.start().await.context("Startup load did not complete")?;
    out.print(render_page(&page, format)?);
    Ok(())
}

pub(crate) fn mount_page(config: LoaderConfig, fetcher: Arc<dyn FetchService>) -> Result<Page> {
    let document = SharedDocument::new(skeleton().context("Failed to build the page skeleton")?);
    Page::mount(document, config, fetcher).context("Failed to mount the page")
}

fn render_page(page: &Page, format: RenderFormat) -> Result<String> {
    match format {
        RenderFormat::Html => Ok(page.to_html()),
        RenderFormat::Text => body_text(page),
    }
}

/// The table body as a terminal table, cells as they appear in the document.
pub(crate) fn body_text(page: &Page) -> Result<String> {
    let rows = page
        .table_body()
        .cell_texts()
        .context("Failed to read the table body")?;

    let mut builder = Builder::default();
    builder.push_record(TABLE_HEADERS.map(str::to_owned));
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    Ok(table.to_string())
}

#[cfg(test)]
mod tests {
    use people_business::test_utils::MockFetcher;
    use serde_json::json;

    use super::*;

    async fn loaded_page(fetcher: MockFetcher) -> Page {
        let page = mount_page(LoaderConfig::default(), Arc::new(fetcher)).unwrap();
        page.start().await.unwrap();
        page
    }

    #[tokio::test]
    async fn test_html_contains_escaped_rows() {
        let page = loaded_page(MockFetcher::json(
            200,
            json!([{"name": "A&B", "username": "ab", "email": "a@b.com"}]),
        ))
        .await;

        let html = render_page(&page, RenderFormat::Html).unwrap();
        assert!(html.starts_with("<body><h1 style=\"color: purple\">Hello world from JS</h1>"));
        assert!(html.contains("<tbody><tr><td>A&amp;B</td><td>ab</td><td>a@b.com</td></tr></tbody>"));
    }

    #[tokio::test]
    async fn test_text_lists_header_and_cells() {
        let page = loaded_page(MockFetcher::json(
            200,
            json!([{"name": "Leanne", "username": "Bret", "email": "l@b.io"}]),
        ))
        .await;

        let text = render_page(&page, RenderFormat::Text).unwrap();
        for expected in ["Name", "User name", "Email", "Leanne", "Bret", "l@b.io"] {
            assert!(text.contains(expected), "{expected} missing from\n{text}");
        }
    }

    #[tokio::test]
    async fn test_text_shows_status_message() {
        let page = loaded_page(MockFetcher::body(500, "oops")).await;
        let text = render_page(&page, RenderFormat::Text).unwrap();
        assert!(text.contains("Erreur lors de la récupération : HTTP 500"), "{text}");
    }
}
