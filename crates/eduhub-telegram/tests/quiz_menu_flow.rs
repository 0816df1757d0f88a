//! End-to-end menu flow through the public callback API.
//!
//! Drives exams → papers → play link the way button presses do, with
//! documents served from memory instead of GitHub.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use eduhub_core::menu::{MenuAction, BACK_LABEL};
use eduhub_core::{ContentSource, FetchError, FontPool, Settings};
use eduhub_persistence::{ChatRegistry, KnownChat};
use eduhub_telegram::callbacks::{EXAMS_UNAVAILABLE, EXAM_NOT_FOUND};
use eduhub_telegram::{resolve_callback, BotState, CallbackOutcome};
use serde_json::{json, Value};
use tempfile::TempDir;

const EXAMS_URL: &str = "mem://exams.json";

/// Serves one exams document, counting requests.
struct ExamsSource {
    body: Option<Value>,
    hits: AtomicUsize,
}

#[async_trait]
impl ContentSource for ExamsSource {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        match (&self.body, url) {
            (Some(body), EXAMS_URL) => Ok(body.clone()),
            _ => Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            }),
        }
    }
}

fn settings(state_dir: &std::path::Path) -> Settings {
    let vars: HashMap<&str, String> = HashMap::from([
        ("EDUHUB_STATE_DIR", state_dir.display().to_string()),
        ("EDUHUB_EXAMS_URL", EXAMS_URL.to_string()),
        ("EDUHUB_PLAY_BASE_URL", "https://play.example/".to_string()),
    ]);
    Settings::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn exams_doc() -> Value {
    let mut exams: Vec<Value> = (1..=7)
        .map(|i| json!({"title": format!("Mock Test {i}"), "papers": []}))
        .collect();
    let papers: Vec<Value> = (1..=8)
        .map(|i| {
            json!({
                "exam": "NEET",
                "examGroup": "Medical",
                "metaId": format!("neet-{i}"),
                "title": format!("NEET Paper {i}")
            })
        })
        .collect();
    exams.push(json!({"title": "NEET UG", "papers": papers}));
    Value::Array(exams)
}

fn state(dir: &TempDir, body: Option<Value>) -> (BotState, Arc<ExamsSource>) {
    let source = Arc::new(ExamsSource {
        body,
        hits: AtomicUsize::new(0),
    });
    let state = BotState::with_parts(
        settings(dir.path()),
        Arc::clone(&source) as Arc<dyn ContentSource>,
        FontPool::default(),
        ChatRegistry::in_memory(),
    );
    (state, source)
}

fn expect_menu(outcome: CallbackOutcome) -> eduhub_core::MenuPage {
    match outcome {
        CallbackOutcome::Menu(page) => page,
        other => panic!("expected a menu, got {other:?}"),
    }
}

fn button_for<'a>(page: &'a eduhub_core::MenuPage, label: &str) -> &'a MenuAction {
    page.rows
        .iter()
        .flatten()
        .find(|b| b.label == label)
        .map(|b| &b.action)
        .unwrap_or_else(|| panic!("no button labelled {label}"))
}

#[tokio::test]
async fn test_exam_to_play_link_flow() {
    let dir = TempDir::new().unwrap();
    let (state, source) = state(&dir, Some(exams_doc()));

    let first = expect_menu(resolve_callback(&state, "exams:0").await);
    assert!(first.has_next());
    assert!(!first.has_previous());

    let next = button_for(&first, "➡️ Next").encode();
    let second = expect_menu(resolve_callback(&state, &next).await);
    assert!(second.has_previous());
    assert!(!second.has_next());

    let neet = button_for(&second, "NEET UG").encode();
    let papers = expect_menu(resolve_callback(&state, &neet).await);
    assert!(papers.text.contains("NEET UG"));
    assert!(papers.has_next());
    assert_eq!(button_for(&papers, BACK_LABEL), &MenuAction::ExamsPage(0));

    let more = button_for(&papers, "➡️ Next").encode();
    let last = expect_menu(resolve_callback(&state, &more).await);
    let paper = button_for(&last, "NEET Paper 8").encode();

    assert_eq!(
        resolve_callback(&state, &paper).await,
        CallbackOutcome::PlayLink {
            title: "NEET Paper 8".into(),
            url: "https://play.example/play?metaId=neet-8".into(),
        }
    );

    // The exam list is fetched once and reused for every press.
    assert_eq!(source.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stale_exam_button_is_reported() {
    let dir = TempDir::new().unwrap();
    let (state, _) = state(&dir, Some(exams_doc()));

    assert_eq!(
        resolve_callback(&state, "papers:0:Retired%20Exam").await,
        CallbackOutcome::Notice(EXAM_NOT_FOUND)
    );
}

#[tokio::test]
async fn test_unreachable_catalog_is_reported_and_retried() {
    let dir = TempDir::new().unwrap();
    let (state, source) = state(&dir, None);

    assert_eq!(
        resolve_callback(&state, "exams:0").await,
        CallbackOutcome::Notice(EXAMS_UNAVAILABLE)
    );
    assert_eq!(
        resolve_callback(&state, "exams:1").await,
        CallbackOutcome::Notice(EXAMS_UNAVAILABLE)
    );
    // Failures are not cached.
    assert_eq!(source.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_known_chats_survive_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("chats.json");

    let source: Arc<dyn ContentSource> = Arc::new(ExamsSource {
        body: None,
        hits: AtomicUsize::new(0),
    });
    let state = BotState::with_parts(
        settings(dir.path()),
        Arc::clone(&source),
        FontPool::default(),
        ChatRegistry::open(&path).unwrap(),
    );
    state
        .register_chat(KnownChat::new(-1001, None, Some("NEET 2026 Batch".into())))
        .await;
    state
        .register_chat(KnownChat::new(42, Some("asha".into()), Some("Asha".into())))
        .await;
    drop(state);

    let reopened = ChatRegistry::open(&path).unwrap();
    assert_eq!(reopened.ids(), vec![-1001, 42]);
}
