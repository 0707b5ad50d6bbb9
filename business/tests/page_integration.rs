//! Mounting the page against a mock users endpoint.

mod common;

use std::sync::Arc;
use std::time::Duration;

use people_business::page::skeleton;
use people_business::{Page, ReqwestFetcher};
use people_dom::SharedDocument;
use wiremock::ResponseTemplate;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

use crate::common::{USERS_PATH, config_for, sample_users};

async fn mount_page(server: &MockServer) -> Page {
    let _ = env_logger::builder().is_test(true).try_init();
    let document = SharedDocument::new(skeleton().unwrap());
    Page::mount(
        document,
        config_for(server, Duration::from_secs(5)),
        Arc::new(ReqwestFetcher::default()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_page_renders_escaped_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_users()))
        .mount(&server)
        .await;

    let page = mount_page(&server).await;
    page.start().await.unwrap();

    let html = page.to_html();
    assert!(html.contains("<td>Leanne Graham</td><td>Bret</td><td>Sincere@april.biz</td>"));
    assert!(html.contains("<td>&lt;b&gt;Ervin&lt;/b&gt;</td>"));
    assert!(!html.contains("<b>Ervin</b>"));
    assert_eq!(page.table_body().cell_texts().unwrap().len(), 2);
}

#[tokio::test]
async fn test_page_shows_status_row_on_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let page = mount_page(&server).await;
    page.start().await.unwrap();

    assert!(page.to_html().contains(
        "<tbody><tr><td colspan=\"3\">Erreur lors de la récupération : HTTP 503</td></tr></tbody>"
    ));
}
