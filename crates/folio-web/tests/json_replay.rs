#![forbid(unsafe_code)]

//! Drive a page entirely from JSON payloads, as the JS host does, and check
//! that replays produce identical batches.

use core::time::Duration;

use folio_core::mutation::{UiClass, UiMutation};
use folio_runtime::config::PageConfig;
use folio_runtime::event::PageEvent;
use folio_runtime::markup::PageMarkup;
use folio_runtime::page::Page;
use folio_runtime::submit::SimulatedSubmitter;
use folio_web::{LayoutSnapshot, StepPage};
use pretty_assertions::assert_eq;

const MARKUP: &str = r##"{
    "sections": ["home", "skills"],
    "nav_links": [
        {"id": "nav-home", "href": "#home"},
        {"id": "nav-skills", "href": "#skills"}
    ],
    "navbar": "navbar",
    "observed": [
        {"id": "stat", "tags": "COUNTER", "counter_target": "40"}
    ],
    "hero_title": {"id": "hero-title", "text": "Hello"},
    "loading_overlay": "loader"
}"##;

const LAYOUT: &str = r#"{
    "viewport_height": 800,
    "regions": {
        "home": {"top": 0, "height": 900},
        "skills": {"top": 900, "height": 900},
        "stat": {"top": 1000, "height": 40}
    }
}"#;

const SCRIPT: &[(u64, &str)] = &[
    (0, r#"{"kind":"dom_ready"}"#),
    (0, r#"{"kind":"loaded"}"#),
    (16, r#"{"kind":"scroll","offset":450}"#),
    (16, r#"{"kind":"scroll","offset":720}"#),
    (400, r#"{"kind":"nav_toggle"}"#),
];

fn build() -> StepPage<folio_core::geometry::StaticLayout> {
    let markup = PageMarkup::from_json_str(MARKUP).expect("markup parses");
    let layout = LayoutSnapshot::from_json_str(LAYOUT)
        .expect("layout parses")
        .to_layout();
    let config = PageConfig::from_json_str(r#"{"seed": 7}"#).expect("config parses");
    StepPage::new(
        Page::new(markup, config, layout, SimulatedSubmitter::new()).expect("page builds"),
    )
}

/// Replay the script one step per 16 ms frame for 4 s, collecting hashes.
fn replay() -> (Vec<UiMutation>, Vec<String>) {
    let mut sp = build();
    let mut all = Vec::new();
    let mut hashes = Vec::new();
    let mut script = SCRIPT.iter().peekable();
    for frame in 0..=250u64 {
        let now = frame * 16;
        while let Some((at, json)) = script.peek() {
            if *at > now {
                break;
            }
            sp.push_event(PageEvent::from_json_str(json).expect("event parses"));
            script.next();
        }
        sp.set_time(Duration::from_millis(now));
        sp.step();
        let out = sp.take_outputs();
        if let Some(hash) = out.batch_hash {
            hashes.push(hash);
        }
        all.extend(out.mutations);
    }
    (all, hashes)
}

#[test]
fn replay_is_bit_identical() {
    let (a, ha) = replay();
    let (b, hb) = replay();
    assert_eq!(ha, hb);
    assert_eq!(a, b);
}

#[test]
fn replay_reaches_expected_end_state() {
    let (all, _) = replay();
    assert!(all.contains(&UiMutation::add_class("nav-skills", UiClass::Active)));
    assert!(all.contains(&UiMutation::add_class("navbar", UiClass::Scrolled)));
    assert!(all.contains(&UiMutation::add_class("stat", UiClass::Visible)));

    let last_stat = all.iter().rev().find_map(|m| match m {
        UiMutation::SetText { target, text } if target == "stat" => Some(text.as_str()),
        _ => None,
    });
    assert_eq!(last_stat, Some("40"));

    let last_title = all.iter().rev().find_map(|m| match m {
        UiMutation::SetText { target, text } if target == "hero-title" => Some(text.as_str()),
        _ => None,
    });
    assert_eq!(last_title, Some("Hello"));
    assert!(all.contains(&UiMutation::RemoveElement {
        target: "loader".into()
    }));
}

#[test]
fn bad_payloads_are_rejected() {
    assert!(PageEvent::from_json_str(r#"{"kind":"teleport"}"#).is_err());
    assert!(LayoutSnapshot::from_json_str("[]").is_err());
    assert!(PageMarkup::from_json_str(r#"{"sections":["a","a"]}"#).is_err());
}
