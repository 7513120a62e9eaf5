// End-to-end discovery runs against a mock site

use scopecrawl::{RunOptions, RunReport, execute_run};
use scopecrawl_scanner::EngineConfig;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_bytes(body.as_bytes().to_vec()),
        )
        .mount(server)
        .await;
}

/// Mounts a route that must never be requested.
async fn mount_forbidden(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

/// A small listing site with out-of-scope sections, assets and junk links.
async fn listing_site() -> MockServer {
    listing_site_with_partner("https://elsewhere.example").await
}

/// The listing site, linking out to a partner page under `partner_origin`.
async fn listing_site_with_partner(partner_origin: &str) -> MockServer {
    let server = MockServer::start().await;

    let seed_page = format!(
        r#"<html><body>
            <a href="/dubai/villas">Villas</a>
            <a href="/dubai/villas#gallery">Villa gallery</a>
            <a href="apartments">Apartments</a>
            <a href="/sharjah/">Sharjah</a>
            <a href="/downloads/dubai-brochure.pdf">Brochure</a>
            <a href="/downloads/sharjah-brochure.pdf">Other brochure</a>
            <a href="{}/dubai/">Partner</a>
            <a href="javascript:void(0)">Menu</a>
            <a href="mailto:sales@example.com">Mail us</a>
            <a href="tel:+97100000000">Call us</a>
        </body></html>"#,
        partner_origin
    );
    mount_html(&server, "/dubai/", &seed_page).await;
    mount_html(
        &server,
        "/dubai/villas",
        r#"<a href="/dubai/">Back</a>
           <a href="/dubai/villas/12">Villa 12</a>
           <a href="/media/dubai-tour.mp4">Tour</a>"#,
    )
    .await;
    mount_html(&server, "/dubai/apartments", r#"<a href="/dubai/villas">Villas</a>"#).await;
    mount_html(&server, "/dubai/villas/12", "<html><body>Villa</body></html>").await;

    mount_forbidden(&server, "/sharjah/").await;
    mount_forbidden(&server, "/downloads/dubai-brochure.pdf").await;
    mount_forbidden(&server, "/media/dubai-tour.mp4").await;

    server
}

fn options(server: &MockServer, same_domain_only: bool) -> RunOptions {
    RunOptions {
        seeds: vec![format!("{}/dubai/", server.uri())],
        same_domain_only,
        engine: EngineConfig {
            max_concurrency: 4,
            navigation_timeout: Duration::from_secs(5),
            handler_timeout: Duration::from_secs(5),
            ..EngineConfig::default()
        },
        show_progress_bars: false,
    }
}

async fn run(server: &MockServer, same_domain_only: bool) -> RunReport {
    execute_run(options(server, same_domain_only), None)
        .await
        .expect("run should succeed")
}

#[tokio::test]
async fn test_discovers_in_scope_pages_and_assets() {
    let server = listing_site().await;
    let base = server.uri();

    let report = run(&server, true).await;

    assert_eq!(
        report.urls,
        vec![
            format!("{}/downloads/dubai-brochure.pdf", base),
            format!("{}/dubai/", base),
            format!("{}/dubai/apartments", base),
            format!("{}/dubai/villas", base),
            format!("{}/dubai/villas/12", base),
            format!("{}/media/dubai-tour.mp4", base),
        ]
    );
    assert_eq!(report.stats.requests, 4);
    assert_eq!(report.stats.pages_handled, 4);
    assert_eq!(report.stats.failed_requests, 0);
    assert!(report.same_domain_only);
}

#[tokio::test]
async fn test_results_never_contain_fragments_or_unsupported_schemes() {
    let server = listing_site().await;

    let report = run(&server, true).await;

    for url in &report.urls {
        assert!(!url.contains('#'), "fragment leaked into results: {}", url);
        assert!(
            url.starts_with("http://") || url.starts_with("https://"),
            "unsupported scheme in results: {}",
            url
        );
    }
}

#[tokio::test]
async fn test_identical_site_yields_identical_results() {
    let server = listing_site().await;

    let first = run(&server, true).await;
    let second = run(&server, true).await;

    assert_eq!(first.urls, second.urls);
}

/// A second local server reached under a different hostname than the seed.
async fn partner_site() -> (MockServer, String) {
    let partner = MockServer::start().await;
    mount_html(&partner, "/dubai/", "<html><body>Partner listings</body></html>").await;
    let origin = partner.uri().replace("127.0.0.1", "localhost");
    (partner, origin)
}

async fn partner_requests(partner: &MockServer) -> usize {
    partner
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_same_domain_skips_foreign_links() {
    let (partner, origin) = partner_site().await;
    let server = listing_site_with_partner(&origin).await;

    let report = run(&server, true).await;

    assert!(!report.urls.iter().any(|url| url.starts_with(&origin)));
    assert_eq!(partner_requests(&partner).await, 0);
}

#[tokio::test]
async fn test_any_domain_records_foreign_links() {
    let (partner, origin) = partner_site().await;
    let server = listing_site_with_partner(&origin).await;

    let report = run(&server, false).await;

    assert!(report.urls.contains(&format!("{}/dubai/", origin)));
    assert_eq!(partner_requests(&partner).await, 1);
    assert_eq!(report.stats.failed_requests, 0);
}

#[tokio::test]
async fn test_request_ceiling_bounds_the_run() {
    let server = listing_site().await;

    let report = execute_run(
        RunOptions {
            engine: EngineConfig {
                max_requests: 1,
                ..options(&server, true).engine
            },
            ..options(&server, true)
        },
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.stats.requests, 1);
    assert!(report.stats.ceiling_reached);
    // Links on the seed page are still recorded.
    assert!(report.urls.len() > 1);
}

#[tokio::test]
async fn test_unreachable_seed_still_reports_seed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let report = execute_run(
        RunOptions {
            seeds: vec![format!("{}/down/", server.uri()), "not a url".to_string()],
            ..options(&server, true)
        },
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.urls, vec![format!("{}/down/", server.uri())]);
    assert_eq!(report.stats.failed_requests, 1);
    assert_eq!(report.stats.pages_handled, 0);
}

#[tokio::test]
async fn test_asset_seed_is_recorded_but_never_fetched() {
    let server = MockServer::start().await;
    mount_forbidden(&server, "/files/dubai-brochure.pdf").await;
    let seed = format!("{}/files/dubai-brochure.pdf", server.uri());

    let report = execute_run(
        RunOptions {
            seeds: vec![seed.clone()],
            ..options(&server, true)
        },
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.urls, vec![seed]);
    assert_eq!(report.stats.requests, 0);
}

#[tokio::test]
async fn test_asset_seed_alongside_page_seed() {
    let server = listing_site().await;
    mount_forbidden(&server, "/dubai/floorplan.pdf").await;

    let report = execute_run(
        RunOptions {
            seeds: vec![
                format!("{}/dubai/", server.uri()),
                format!("{}/dubai/floorplan.pdf", server.uri()),
            ],
            ..options(&server, true)
        },
        None,
    )
    .await
    .unwrap();

    assert!(report.urls.contains(&format!("{}/dubai/floorplan.pdf", server.uri())));
    assert_eq!(report.stats.requests, 4);
}
