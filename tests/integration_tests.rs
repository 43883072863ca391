//! Integration tests for techlag
//!
//! These tests verify:
//! - End-to-end analysis against a mocked npm registry
//! - Manifest-by-URL mode
//! - Fatal manifest errors and the per-dependency skip policy

use mockito::{Server, ServerGuard};
use techlag::domain::SkipReason;
use techlag::error::{FetchError, ParseError};
use techlag::{AnalysisRequest, AnalyzerConfig, DependencyKind, LagAnalyzer, LagError};

/// Build a packument body listing `versions`; the last one is tagged latest
fn packument(name: &str, versions: &[&str]) -> String {
    let entries: Vec<String> = versions
        .iter()
        .map(|v| format!(r#""{}": {{"name": "{}", "version": "{}"}}"#, v, name, v))
        .collect();
    let times: Vec<String> = versions
        .iter()
        .enumerate()
        .map(|(i, v)| format!(r#""{}": "2016-01-{:02}T00:00:00.000Z""#, v, i + 1))
        .collect();
    format!(
        r#"{{"name": "{}", "dist-tags": {{"latest": "{}"}}, "versions": {{{}}}, "time": {{{}}}}}"#,
        name,
        versions.last().copied().unwrap_or("0.0.0"),
        entries.join(", "),
        times.join(", ")
    )
}

fn config(server: &ServerGuard) -> AnalyzerConfig {
    AnalyzerConfig::default()
        .with_registry_url(server.url())
        .with_max_retries(0)
}

async fn mock_json(server: &mut ServerGuard, path: &str, body: String) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

mod package_mode {
    use super::*;

    const GRUNT_MANIFEST: &str = r#"{
        "name": "grunt",
        "version": "1.0.0",
        "dependencies": {
            "coffee-script": "~1.10.0",
            "dateformat": "1.0.12",
            "eventemitter2": "^0.4.13",
            "exit": "~0.1.1"
        },
        "devDependencies": {
            "difflet": "~0.2.3"
        }
    }"#;

    async fn grunt_registry(server: &mut ServerGuard) -> Vec<mockito::Mock> {
        vec![
            mock_json(server, "/grunt/1.0.0", GRUNT_MANIFEST.to_string()).await,
            mock_json(
                server,
                "/coffee-script",
                packument("coffee-script", &["1.9.3", "1.10.0", "1.11.0", "1.11.1", "1.12.7"]),
            )
            .await,
            mock_json(
                server,
                "/dateformat",
                packument("dateformat", &["1.0.11", "1.0.12", "2.0.0", "3.0.3"]),
            )
            .await,
            mock_json(
                server,
                "/eventemitter2",
                packument("eventemitter2", &["0.4.13", "0.4.14", "1.0.0", "6.4.9"]),
            )
            .await,
            mock_json(server, "/exit", packument("exit", &["0.1.0", "0.1.1", "0.1.2"])).await,
        ]
    }

    #[tokio::test]
    async fn test_grunt_dependencies_all_reported() {
        let mut server = Server::new_async().await;
        let mocks = grunt_registry(&mut server).await;

        let request =
            AnalysisRequest::for_package("grunt", "1.0.0", DependencyKind::Dependencies).unwrap();
        let report = LagAnalyzer::new(request, &config(&server))
            .unwrap()
            .analyze()
            .await
            .unwrap();

        for mock in &mocks {
            mock.assert_async().await;
        }

        assert_eq!(report.package.as_deref(), Some("grunt@1.0.0"));
        let names: Vec<&str> = report.results.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["coffee-script", "dateformat", "eventemitter2", "exit"]
        );
        for result in report.results.values() {
            assert_eq!(result.breakdown.total(), result.lag);
        }

        let coffee = &report.results["coffee-script"];
        assert_eq!(coffee.resolved, "1.10.0");
        assert_eq!(coffee.latest, "1.12.7");
        assert_eq!(coffee.lag, 3);
        assert_eq!(coffee.breakdown.minor, 2);
        assert_eq!(coffee.breakdown.patch, 1);
        assert!(coffee.resolved_published_at.is_some());

        assert_eq!(report.results["dateformat"].lag, 2);
        assert_eq!(report.results["eventemitter2"].resolved, "0.4.14");
        assert_eq!(report.results["eventemitter2"].breakdown.major, 2);
        assert!(report.results["exit"].is_current());
        assert!(!report.has_skipped());
    }

    #[tokio::test]
    async fn test_dist_tag_version_resolves_manifest() {
        let mut server = Server::new_async().await;
        let _grunt = mock_json(
            &mut server,
            "/grunt",
            packument("grunt", &["0.4.5", "1.0.0"]),
        )
        .await;
        let _manifest = mock_json(
            &mut server,
            "/grunt/1.0.0",
            r#"{"name": "grunt", "version": "1.0.0", "devDependencies": {}}"#.to_string(),
        )
        .await;

        let request =
            AnalysisRequest::for_package("grunt", "latest", DependencyKind::DevDependencies)
                .unwrap();
        let report = LagAnalyzer::new(request, &config(&server))
            .unwrap()
            .analyze()
            .await
            .unwrap();

        assert_eq!(report.package.as_deref(), Some("grunt@1.0.0"));
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_absent_kind_is_empty_report() {
        let mut server = Server::new_async().await;
        let _mocks = grunt_registry(&mut server).await;

        let request =
            AnalysisRequest::for_package("grunt", "1.0.0", DependencyKind::OptionalDependencies)
                .unwrap();
        let report = LagAnalyzer::new(request, &config(&server))
            .unwrap()
            .analyze()
            .await
            .unwrap();

        assert!(report.results.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_package_is_fatal() {
        let mut server = Server::new_async().await;
        let _missing = server
            .mock("GET", "/no-such-package/1.0.0")
            .with_status(404)
            .create_async()
            .await;

        let request =
            AnalysisRequest::for_package("no-such-package", "1.0.0", DependencyKind::Dependencies)
                .unwrap();
        let err = LagAnalyzer::new(request, &config(&server))
            .unwrap()
            .analyze()
            .await
            .unwrap_err();

        assert!(matches!(err, LagError::Fetch(FetchError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_failing_dependency_is_skipped() {
        let mut server = Server::new_async().await;
        let _manifest = mock_json(
            &mut server,
            "/app/2.0.0",
            r#"{"name": "app", "version": "2.0.0", "dependencies": {
                "flaky": "^1.0.0",
                "garbled": "^1.0.0",
                "@scope/util": "~1.1.0",
                "pinned": "3.0.0"
            }}"#
            .to_string(),
        )
        .await;
        let _flaky = server
            .mock("GET", "/flaky")
            .with_status(500)
            .create_async()
            .await;
        let _garbled = server
            .mock("GET", "/garbled")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;
        let _scoped = mock_json(
            &mut server,
            "/@scope%2Futil",
            packument("@scope/util", &["1.0.0", "1.1.0", "1.1.3", "1.2.0"]),
        )
        .await;
        let _pinned = mock_json(
            &mut server,
            "/pinned",
            packument("pinned", &["2.0.0", "3.1.0"]),
        )
        .await;

        let request =
            AnalysisRequest::for_package("app", "2.0.0", DependencyKind::Dependencies).unwrap();
        let report = LagAnalyzer::new(request, &config(&server))
            .unwrap()
            .analyze()
            .await
            .unwrap();

        assert_eq!(report.results.len(), 1);
        let scoped = &report.results["@scope/util"];
        assert_eq!(scoped.resolved, "1.1.3");
        assert_eq!(scoped.lag, 1);

        let skipped: Vec<(&str, &SkipReason)> = report
            .skipped
            .iter()
            .map(|s| (s.name.as_str(), &s.reason))
            .collect();
        assert_eq!(skipped.len(), 3);
        assert_eq!(skipped[0].0, "flaky");
        assert!(matches!(skipped[0].1, SkipReason::FetchFailed(msg) if msg.contains("500")));
        assert_eq!(skipped[1].0, "garbled");
        assert!(matches!(skipped[1].1, SkipReason::InvalidResponse(_)));
        assert_eq!(skipped[2].0, "pinned");
        assert!(matches!(skipped[2].1, SkipReason::Unresolved(msg) if msg.contains("3.0.0")));
    }
}

mod url_mode {
    use super::*;

    #[tokio::test]
    async fn test_jasmine_core_tilde_range() {
        let mut server = Server::new_async().await;
        let _manifest = mock_json(
            &mut server,
            "/raw/package.json",
            r#"{"name": "demo", "devDependencies": {"jasmine-core": "~2.4.0"}}"#.to_string(),
        )
        .await;
        let _jasmine = mock_json(
            &mut server,
            "/jasmine-core",
            packument(
                "jasmine-core",
                &["2.3.4", "2.4.0", "2.4.1", "2.5.0", "2.5.1", "2.5.2", "3.0.0"],
            ),
        )
        .await;

        let url = format!("{}/raw/package.json", server.url());
        let request =
            AnalysisRequest::for_manifest_url(&url, DependencyKind::DevDependencies).unwrap();
        let report = LagAnalyzer::new(request, &config(&server))
            .unwrap()
            .analyze()
            .await
            .unwrap();

        let jasmine = &report.results["jasmine-core"];
        assert_eq!(jasmine.resolved, "2.4.1");
        assert_eq!(jasmine.latest, "3.0.0");
        assert_eq!(jasmine.lag, 4);
        assert_eq!(jasmine.breakdown.major, 1);
        assert_eq!(jasmine.breakdown.minor, 1);
        assert_eq!(jasmine.breakdown.patch, 2);
    }

    #[tokio::test]
    async fn test_non_json_manifest_is_parse_error() {
        let mut server = Server::new_async().await;
        let _manifest = server
            .mock("GET", "/index.html")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<!doctype html><p>not a manifest</p>")
            .create_async()
            .await;

        let url = format!("{}/index.html", server.url());
        let request = AnalysisRequest::for_manifest_url(&url, DependencyKind::Dependencies).unwrap();
        let err = LagAnalyzer::new(request, &config(&server))
            .unwrap()
            .analyze()
            .await
            .unwrap_err();

        assert!(matches!(err, LagError::Parse(ParseError::InvalidJson { .. })));
    }

    #[tokio::test]
    async fn test_array_manifest_is_parse_error() {
        let mut server = Server::new_async().await;
        let _manifest = mock_json(&mut server, "/list.json", "[1, 2, 3]".to_string()).await;

        let url = format!("{}/list.json", server.url());
        let request = AnalysisRequest::for_manifest_url(&url, DependencyKind::Dependencies).unwrap();
        let err = LagAnalyzer::new(request, &config(&server))
            .unwrap()
            .analyze()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LagError::Parse(ParseError::UnexpectedShape { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let request = AnalysisRequest::for_manifest_url(
            "http://127.0.0.1:1/package.json",
            DependencyKind::Dependencies,
        )
        .unwrap();
        let config = AnalyzerConfig::default().with_max_retries(0);
        let err = LagAnalyzer::new(request, &config)
            .unwrap()
            .analyze()
            .await
            .unwrap_err();

        assert!(matches!(err, LagError::Fetch(_)));
    }
}

/// Talks to the public npm registry; run with `cargo test -- --ignored`
#[tokio::test]
#[ignore]
async fn test_live_grunt_dependencies() {
    let request =
        AnalysisRequest::for_package("grunt", "1.0.0", DependencyKind::Dependencies).unwrap();
    let report = LagAnalyzer::new(request, &AnalyzerConfig::default())
        .unwrap()
        .analyze()
        .await
        .unwrap();

    assert!(report.results.contains_key("coffee-script"));
    assert!(report.results.contains_key("dateformat"));
    for result in report.results.values() {
        assert_eq!(result.breakdown.total(), result.lag);
    }
}
