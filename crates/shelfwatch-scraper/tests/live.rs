//! Live browser smoke tests.
//!
//! These launch a real Chromium install and are ignored by default. Run with
//! `cargo test -p shelfwatch-scraper -- --ignored` on a machine with a
//! browser available (or `SHELFWATCH_CHROME_BIN` pointing at one).

use std::path::PathBuf;
use std::time::Duration;

use shelfwatch_core::{AppConfig, SearchTask};
use shelfwatch_scraper::{BrowserSession, ResponseInterceptor};

fn live_config() -> AppConfig {
    AppConfig {
        headless: true,
        output_dir: PathBuf::from("output"),
        tasks_path: PathBuf::from("config/tasks.yaml"),
        log_level: "info".to_owned(),
        nav_timeout_secs: 30,
        task_timeout_secs: 90,
        capture_wait_secs: 10,
        capture_idle_ms: 800,
        selector_wait_secs: 5,
        max_retries: 1,
        retry_backoff_base_secs: 1,
        task_delay_ms: 0,
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
            .to_owned(),
        viewport: (1280, 800),
        chrome_binary: None,
    }
}

#[tokio::test]
#[ignore] // Requires a Chromium binary and network access.
async fn session_captures_the_document_response() {
    let config = live_config();
    let session = BrowserSession::launch(&config)
        .await
        .expect("browser launch failed");

    let interceptor = ResponseInterceptor::attach(session.page(), &["example.com".to_owned()])
        .await
        .expect("interceptor attach failed");
    interceptor
        .begin_task(&SearchTask::new("smoke", "000000"))
        .await;

    session
        .goto("https://example.com")
        .await
        .expect("navigation failed");

    let captured = interceptor
        .wait_for_quiescence(Duration::from_secs(10), Duration::from_millis(800))
        .await;
    assert!(captured >= 1, "expected at least the document response");

    let captures = interceptor.drain().await;
    assert_eq!(captures[0].task.keyword, "smoke");
    assert!(
        captures[0].body.contains("Example Domain"),
        "document body should round-trip through the interceptor"
    );

    session.close().await;
}
