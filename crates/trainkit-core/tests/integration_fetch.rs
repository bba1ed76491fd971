//! Integration test: local HTTP server, real libcurl fetches, files on disk.

mod common;

use common::page_server::{self, Route};
use std::fs;
use tempfile::tempdir;
use trainkit_core::config::FetchSettings;
use trainkit_core::fetch::{
    fetch_page, run_batch, BatchOptions, CurlFetcher, FetchError, FetchOutcome, FetchRequest,
};

fn settings() -> FetchSettings {
    FetchSettings {
        delay_secs: 0.0,
        connect_timeout_secs: Some(5),
        ..FetchSettings::default()
    }
}

fn request(url: String, output: std::path::PathBuf, redirect_only: bool) -> FetchRequest {
    FetchRequest {
        url,
        output,
        cookies: Vec::new(),
        redirect_only,
    }
}

#[test]
fn meta_charset_takes_precedence_over_header() {
    let server = page_server::start(vec![(
        "/page",
        Route::page(
            "text/html; charset=UTF-8",
            b"<html><head><meta charset=\"ISO-8859-1\"></head><body>caf\xe9</body></html>",
        ),
    )]);
    let dir = tempdir().unwrap();
    let out = dir.path().join("page.html");

    let outcome = fetch_page(&request(server.url("/page"), out.clone(), false), &settings())
        .expect("fetch");
    match outcome {
        FetchOutcome::Written { path, charset } => {
            assert_eq!(path, out);
            assert_eq!(charset, "ISO-8859-1");
        }
        other => panic!("expected Written, got {:?}", other),
    }
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("<body>café</body>"));
}

#[test]
fn latin1_meta_preserves_c1_bytes_on_disk() {
    let server = page_server::start(vec![(
        "/quotes",
        Route::page(
            "text/html",
            b"<meta charset=\"iso-8859-1\"><p>\x93quoted\x94 \x80</p>",
        ),
    )]);
    let dir = tempdir().unwrap();
    let out = dir.path().join("quotes.html");

    fetch_page(&request(server.url("/quotes"), out.clone(), false), &settings()).expect("fetch");
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.ends_with("<p>\u{93}quoted\u{94} \u{80}</p>"));
}

#[test]
fn header_charset_used_and_output_is_utf8() {
    let body = "<p>привет</p>";
    let encoded = encode_as("koi8-r", body);
    let server = page_server::start(vec![(
        "/ru",
        Route::page("text/html; charset=koi8-r", &encoded),
    )]);
    let dir = tempdir().unwrap();
    let out = dir.path().join("ru.html");

    fetch_page(&request(server.url("/ru"), out.clone(), false), &settings()).expect("fetch");
    assert_eq!(fs::read_to_string(&out).unwrap(), body);
}

fn encode_as(label: &str, text: &str) -> Vec<u8> {
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes()).unwrap();
    let (bytes, _, had_errors) = encoding.encode(text);
    assert!(!had_errors);
    bytes.into_owned()
}

#[test]
fn redirect_only_with_200_writes_nothing() {
    let server = page_server::start(vec![("/plain", Route::page("text/html", b"<p>hi</p>"))]);
    let dir = tempdir().unwrap();
    let out = dir.path().join("plain.html");

    let outcome =
        fetch_page(&request(server.url("/plain"), out.clone(), true), &settings()).expect("fetch");
    assert_eq!(outcome, FetchOutcome::NotRedirected(200));
    assert!(!out.exists());
}

#[test]
fn redirect_only_with_302_returns_location_without_writing() {
    let server = page_server::start(vec![(
        "/short",
        Route::redirect(302, "http://example.com/new"),
    )]);
    let dir = tempdir().unwrap();
    let out = dir.path().join("short.html");

    let outcome =
        fetch_page(&request(server.url("/short"), out.clone(), true), &settings()).expect("fetch");
    assert_eq!(
        outcome,
        FetchOutcome::Redirect("http://example.com/new".to_string())
    );
    assert!(!out.exists());
    assert_eq!(server.requests().len(), 1, "redirect must not be followed");
}

#[test]
fn normal_mode_follows_redirects() {
    let server = page_server::start(vec![
        ("/old", Route::redirect(301, "/new")),
        ("/new", Route::page("text/html; charset=utf-8", b"<p>moved here</p>")),
    ]);
    let dir = tempdir().unwrap();
    let out = dir.path().join("old.html");

    fetch_page(&request(server.url("/old"), out.clone(), false), &settings()).expect("fetch");
    assert_eq!(fs::read_to_string(&out).unwrap(), "<p>moved here</p>");
}

#[test]
fn http_error_status_is_reported() {
    let server = page_server::start(vec![]);
    let dir = tempdir().unwrap();
    let out = dir.path().join("missing.html");

    let err = fetch_page(&request(server.url("/missing"), out.clone(), false), &settings())
        .unwrap_err();
    assert!(matches!(err, FetchError::Http { code: 404, .. }));
    assert!(!out.exists());
}

#[test]
fn browser_headers_and_cookies_are_sent() {
    let server = page_server::start(vec![("/", Route::page("text/html", b"ok"))]);
    let dir = tempdir().unwrap();
    let req = FetchRequest {
        url: server.url("/"),
        output: dir.path().join("index.html"),
        cookies: vec![
            ("session".to_string(), "abc".to_string()),
            ("lang".to_string(), "he".to_string()),
        ],
        redirect_only: false,
    };
    fetch_page(&req, &settings()).expect("fetch");

    let head = server.requests().remove(0).to_ascii_lowercase();
    assert!(head.contains("user-agent: mozilla/5.0 (x11; linux x86_64; rv:18.0)"));
    assert!(head.contains("accept-language: en-us,en;q=0.8,he;q=0.5,es;q=0.3"));
    assert!(head.contains("accept: text/html,application/xhtml+xml"));
    assert!(head.contains("cookie: session=abc; lang=he"));
}

#[test]
fn output_name_is_percent_decoded() {
    let server = page_server::start(vec![("/", Route::page("text/html", b"ok"))]);
    let dir = tempdir().unwrap();
    let out = dir.path().join("en_US.UTF-8%23example.com.html");

    let outcome =
        fetch_page(&request(server.url("/"), out, false), &settings()).expect("fetch");
    let expected = dir.path().join("en_US.UTF-8#example.com.html");
    assert_eq!(
        outcome,
        FetchOutcome::Written {
            path: expected.clone(),
            charset: "ISO-8859-1".to_string()
        }
    );
    assert!(expected.exists());
}

#[test]
fn batch_follows_captured_redirects_and_names_files() {
    let server = page_server::start(vec![
        ("/short", Route::redirect(302, "/article")),
        ("/plain", Route::page("text/html", b"not a redirect")),
        ("/article", Route::page("text/html; charset=utf-8", b"<p>article</p>")),
    ]);
    let dir = tempdir().unwrap();
    let options = BatchOptions {
        language: "he_IL".to_string(),
        redirect_only: true,
        cookies: Vec::new(),
        output_dir: dir.path().to_path_buf(),
    };
    let cfg = settings();
    let fetcher = CurlFetcher::new(cfg.clone());

    let summary = run_batch(
        &fetcher,
        vec![
            server.url("/short"),
            server.url("/plain"),
            server.url("/gone"),
        ],
        &options,
        &cfg,
        |_, _| {},
    );

    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.redirects, vec![server.url("/article")]);
    assert_eq!(summary.not_redirected, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, server.url("/gone"));
    assert_eq!(summary.written.len(), 1);

    let written = &summary.written[0];
    let name = written.file_name().unwrap().to_string_lossy().to_string();
    let host = server.base.trim_start_matches("http://");
    assert!(
        name.starts_with(&format!("he_IL.UTF-8#{}-", host)),
        "unexpected name {}",
        name
    );
    assert_eq!(fs::read_to_string(written).unwrap(), "<p>article</p>");

    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1, "only the redirect target is written");
}

#[test]
fn encoded_separator_in_language_stays_in_output_dir() {
    let server = page_server::start(vec![("/", Route::page("text/html", b"ok"))]);
    let dir = tempdir().unwrap();
    let options = BatchOptions {
        language: "en%2Fsub".to_string(),
        redirect_only: false,
        cookies: Vec::new(),
        output_dir: dir.path().to_path_buf(),
    };
    let cfg = settings();
    let fetcher = CurlFetcher::new(cfg.clone());

    let summary = run_batch(&fetcher, vec![server.url("/")], &options, &cfg, |_, _| {});

    assert_eq!(summary.written.len(), 1);
    let written = &summary.written[0];
    assert_eq!(written.parent(), Some(dir.path()));
    assert!(written.exists());
    assert!(!dir.path().join("en").exists());
}
