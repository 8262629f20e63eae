#![forbid(unsafe_code)]

//! End-to-end page scenarios driven through `Page` alone.

use std::time::Duration;

use folio_core::flags::ObserveTags;
use folio_core::geometry::{Region, StaticLayout};
use folio_core::mutation::{NotificationKind, NotificationPhase, StyleProperty, UiClass, UiMutation};
use folio_runtime::config::PageConfig;
use folio_runtime::event::PageEvent;
use folio_runtime::markup::{
    ButtonSpec, FieldKind, FieldSpec, FilterButtonSpec, FormSpec, HeroTitleSpec, NavLinkSpec,
    ObservedSpec, PageMarkup, PortfolioItemSpec,
};
use folio_runtime::page::{Page, PageNotice};
use folio_runtime::submit::{MESSAGE_SENT, SimulatedSubmitter};

// ============================================================================
// Fixtures
// ============================================================================

fn portfolio_markup() -> PageMarkup {
    let sections = ["home", "about", "portfolio", "contact"];
    PageMarkup {
        sections: sections.iter().map(|s| (*s).to_owned()).collect(),
        nav_links: sections
            .iter()
            .map(|s| NavLinkSpec {
                id: format!("nav-{s}"),
                href: format!("#{s}"),
            })
            .collect(),
        nav_menu: Some("nav-menu".into()),
        nav_toggle: Some("hamburger".into()),
        navbar: Some("navbar".into()),
        observed: vec![
            ObservedSpec {
                id: "about-card".into(),
                tags: ObserveTags::FADE_IN,
                counter_target: None,
            },
            ObservedSpec {
                id: "projects-stat".into(),
                tags: ObserveTags::COUNTER,
                counter_target: Some("150".into()),
            },
            ObservedSpec {
                id: "rust-skill".into(),
                tags: ObserveTags::PROGRESS,
                counter_target: None,
            },
        ],
        filter_buttons: vec![
            FilterButtonSpec {
                id: "filter-all".into(),
                filter: "all".into(),
                active: true,
            },
            FilterButtonSpec {
                id: "filter-web".into(),
                filter: "web".into(),
                active: false,
            },
        ],
        portfolio_items: vec![
            PortfolioItemSpec {
                id: "item-shop".into(),
                category: "web".into(),
            },
            PortfolioItemSpec {
                id: "item-game".into(),
                category: "game".into(),
            },
        ],
        form: Some(FormSpec {
            id: "contact-form".into(),
            fields: vec![
                FieldSpec {
                    name: "name".into(),
                    kind: FieldKind::Text,
                    required: true,
                    label: Some("name-label".into()),
                },
                FieldSpec {
                    name: "email".into(),
                    kind: FieldKind::Email,
                    required: true,
                    label: Some("email-label".into()),
                },
                FieldSpec {
                    name: "message".into(),
                    kind: FieldKind::Textarea,
                    required: false,
                    label: None,
                },
            ],
        }),
        buttons: vec![ButtonSpec {
            id: "hire-me".into(),
            is_submit: false,
        }],
        hero_title: Some(HeroTitleSpec {
            id: "hero-title".into(),
            text: "Building things".into(),
        }),
        hero_elements: vec!["hero-title".into(), "hero-subtitle".into(), "hero-cta".into()],
        loading_overlay: Some("loader".into()),
    }
}

fn portfolio_layout() -> StaticLayout {
    StaticLayout::new(800.0)
        .with_region("home", Region::new(0.0, 900.0))
        .with_region("about", Region::new(900.0, 900.0))
        .with_region("portfolio", Region::new(1800.0, 1200.0))
        .with_region("contact", Region::new(3000.0, 800.0))
        .with_region("about-card", Region::new(1000.0, 300.0))
        .with_region("projects-stat", Region::new(1400.0, 60.0))
        .with_region("rust-skill", Region::new(3100.0, 20.0))
}

fn page() -> Page<StaticLayout> {
    Page::with_defaults(portfolio_markup(), portfolio_layout()).expect("valid page")
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn run_frames(page: &mut Page<StaticLayout>) -> usize {
    let mut frames = 0;
    while page.pending_frames() > 0 {
        page.frame();
        frames += 1;
        assert!(frames < 10_000, "animation never settled");
    }
    frames
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn construction_applies_reveal_styles() {
    let mut page = page();
    assert_eq!(
        page.drain_mutations(),
        vec![UiMutation::add_class("about-card", UiClass::FadeIn)]
    );
    assert!(page.is_idle());
}

#[test]
fn scrolling_through_the_page() {
    let mut page = page();
    page.handle_event(PageEvent::DomReady);
    page.drain_mutations();

    page.handle_event(PageEvent::Scroll { offset: 950.0 });
    page.advance_to(ms(16));
    let out = page.drain_mutations();

    assert!(out.contains(&UiMutation::add_class("about-card", UiClass::Visible)));
    assert!(out.contains(&UiMutation::remove_class("nav-home", UiClass::Active)));
    assert!(out.contains(&UiMutation::add_class("nav-about", UiClass::Active)));
    assert!(out.contains(&UiMutation::add_class("navbar", UiClass::Scrolled)));
    assert_eq!(page.active_link(), Some("nav-about"));
    assert!(page.is_revealed("about"));

    page.handle_event(PageEvent::Scroll { offset: 10.0 });
    page.advance_to(ms(40));
    let out = page.drain_mutations();
    assert!(out.contains(&UiMutation::remove_class("navbar", UiClass::Scrolled)));
    assert!(page.is_revealed("about"), "reveal is permanent");
}

#[test]
fn layout_shift_reveals_without_scrolling() {
    let mut page = page();
    page.handle_event(PageEvent::DomReady);
    page.handle_event(PageEvent::Loaded);
    page.drain_mutations();

    page.layout_mut().set_region("about-card", Region::new(100.0, 200.0));
    page.layout_mut().set_region("projects-stat", Region::new(400.0, 60.0));
    assert!(
        !page
            .drain_mutations()
            .contains(&UiMutation::add_class("about-card", UiClass::Visible))
    );

    page.handle_event(PageEvent::LayoutChanged);
    let out = page.drain_mutations();
    assert!(out.contains(&UiMutation::add_class("about-card", UiClass::Visible)));
    assert!(out.contains(&UiMutation::add_class("projects-stat", UiClass::Visible)));
    assert_eq!(page.scroll_offset(), 0.0);

    page.advance_to(ms(3000));
    run_frames(&mut page);
    let out = page.drain_mutations();
    let last_stat = out.iter().rev().find_map(|m| match m {
        UiMutation::SetText { target, text } if target == "projects-stat" => Some(text.as_str()),
        _ => None,
    });
    assert_eq!(last_stat, Some("150"));

    page.handle_event(PageEvent::LayoutChanged);
    assert!(
        !page
            .drain_mutations()
            .contains(&UiMutation::add_class("about-card", UiClass::Visible)),
        "entry is reported once"
    );
}

#[test]
fn late_load_picks_up_elements_already_in_view() {
    let layout = portfolio_layout().with_region("about-card", Region::new(200.0, 300.0));
    let mut page = Page::with_defaults(portfolio_markup(), layout).expect("valid page");
    page.drain_mutations();
    page.handle_event(PageEvent::Loaded);
    assert!(
        page.drain_mutations()
            .contains(&UiMutation::add_class("about-card", UiClass::Visible))
    );
}

#[test]
fn zero_delay_submitter_settles_without_polling() {
    let submitter = SimulatedSubmitter::new().with_delay(Duration::ZERO);
    let mut page = Page::new(
        portfolio_markup(),
        PageConfig::default(),
        portfolio_layout(),
        submitter,
    )
    .expect("valid page");
    for (name, value) in [("name", "Ada"), ("email", "ada@example.com")] {
        page.handle_event(PageEvent::FieldInput {
            name: name.into(),
            value: value.into(),
        });
    }
    page.handle_event(PageEvent::Submit);
    assert_eq!(page.next_deadline(), Some(Duration::ZERO));
    page.advance_to(Duration::ZERO);
    assert!(page.form().is_some_and(|f| !f.is_submitting()));
    assert_eq!(
        page.notification().map(|n| n.message.as_str()),
        Some(MESSAGE_SENT)
    );
}

#[test]
fn statistic_counts_up_to_its_target() {
    let mut page = page();
    page.handle_event(PageEvent::Scroll { offset: 1000.0 });
    run_frames(&mut page);
    let texts: Vec<i64> = page
        .drain_mutations()
        .into_iter()
        .filter_map(|m| match m {
            UiMutation::SetText { target, text } if target == "projects-stat" => text.parse().ok(),
            _ => None,
        })
        .collect();
    assert_eq!(texts.len(), 125);
    assert!(texts.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(texts.last(), Some(&150));
    assert_eq!(
        page.drain_notices(),
        vec![PageNotice::CounterFinished("projects-stat".into())]
    );

    // Leaving and re-entering never restarts it.
    page.handle_event(PageEvent::Scroll { offset: 0.0 });
    page.handle_event(PageEvent::Scroll { offset: 1000.0 });
    assert_eq!(page.pending_frames(), 0);
}

#[test]
fn skill_bar_animates_once() {
    let mut page = page();
    page.handle_event(PageEvent::Scroll { offset: 2600.0 });
    let out = page.drain_mutations();
    assert!(out.contains(&UiMutation::add_class("rust-skill", UiClass::Animate)));
    page.handle_event(PageEvent::Scroll { offset: 0.0 });
    page.handle_event(PageEvent::Scroll { offset: 2600.0 });
    let again = page.drain_mutations();
    assert!(!again.contains(&UiMutation::add_class("rust-skill", UiClass::Animate)));
}

#[test]
fn load_sequence() {
    let mut page = page();
    page.drain_mutations();
    page.handle_event(PageEvent::Loaded);
    assert_eq!(
        page.drain_mutations(),
        vec![
            UiMutation::set_style("hero-title", StyleProperty::AnimationDelay, "0s"),
            UiMutation::set_style("hero-subtitle", StyleProperty::AnimationDelay, "0.3s"),
            UiMutation::set_style("hero-cta", StyleProperty::AnimationDelay, "0.6s"),
            UiMutation::set_text("hero-title", ""),
        ]
    );

    page.advance_to(ms(1000));
    let out = page.drain_mutations();
    assert_eq!(
        out.first(),
        Some(&UiMutation::set_style("loader", StyleProperty::Opacity, "0"))
    );
    assert_eq!(out.len(), 2, "overlay fade then first scramble frame");

    run_frames(&mut page);
    let out = page.drain_mutations();
    assert_eq!(out.last(), Some(&UiMutation::set_text("hero-title", "Building things")));

    page.advance_to(ms(1499));
    assert!(page.drain_mutations().is_empty());
    page.advance_to(ms(1500));
    assert_eq!(
        page.drain_mutations(),
        vec![UiMutation::RemoveElement {
            target: "loader".into()
        }]
    );
    assert!(page.is_idle());
}

#[test]
fn portfolio_filter_round_trip() {
    let mut page = page();
    page.drain_mutations();
    page.handle_event(PageEvent::FilterClicked {
        button: "filter-web".into(),
    });
    assert_eq!(page.active_filter(), Some("filter-web"));
    page.advance_to(ms(300));
    let out = page.drain_mutations();
    assert!(out.contains(&UiMutation::set_style("item-shop", StyleProperty::Opacity, "1")));
    assert!(out.contains(&UiMutation::set_style("item-game", StyleProperty::Display, "none")));

    page.handle_event(PageEvent::FilterClicked {
        button: "filter-all".into(),
    });
    page.advance_to(ms(600));
    let out = page.drain_mutations();
    assert!(out.contains(&UiMutation::set_style("item-game", StyleProperty::Display, "block")));
    assert!(out.contains(&UiMutation::set_style("item-game", StyleProperty::Opacity, "1")));
}

#[test]
fn contact_form_happy_path() {
    let mut page = page();
    page.drain_mutations();

    page.handle_event(PageEvent::FieldInput {
        name: "email".into(),
        value: "not-an-email".into(),
    });
    page.handle_event(PageEvent::FieldBlur {
        name: "email".into(),
    });
    assert!(page.form().is_some_and(|f| f.has_error("email")));

    for (name, value) in [("name", "Ada"), ("email", "ada@example.com"), ("message", "Hello")] {
        page.handle_event(PageEvent::FieldInput {
            name: name.into(),
            value: value.into(),
        });
    }
    assert!(page.form().is_some_and(|f| !f.has_error("email")));
    page.drain_mutations();

    page.handle_event(PageEvent::Submit);
    assert!(page.form().is_some_and(|f| f.is_submitting()));
    let sent = &page.submitter().submissions()[0];
    assert_eq!(sent.get("email").map(String::as_str), Some("ada@example.com"));
    assert_eq!(sent.get("message").map(String::as_str), Some("Hello"));

    page.advance_to(ms(2000));
    let notification = page.notification().cloned().expect("notification shown");
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, MESSAGE_SENT);
    assert!(page.form().is_some_and(|f| !f.is_submitting()));

    page.advance_to(ms(2100));
    assert_eq!(
        page.notification().map(|n| n.phase),
        Some(NotificationPhase::Visible)
    );
    page.advance_to(ms(7000));
    assert_eq!(
        page.notification().map(|n| n.phase),
        Some(NotificationPhase::Exiting)
    );
    page.advance_to(ms(7300));
    assert!(page.notification().is_none());
}

#[test]
fn submissions_poll_slow_backends() {
    let submitter = SimulatedSubmitter::new().with_delay(ms(5000));
    let mut page = Page::new(
        portfolio_markup(),
        PageConfig::default(),
        portfolio_layout(),
        submitter,
    )
    .expect("valid page");
    for (name, value) in [("name", "Ada"), ("email", "ada@example.com")] {
        page.handle_event(PageEvent::FieldInput {
            name: name.into(),
            value: value.into(),
        });
    }
    page.handle_event(PageEvent::Submit);
    page.advance_to(ms(4999));
    assert!(page.form().is_some_and(|f| f.is_submitting()));
    page.advance_to(ms(5000));
    assert!(page.form().is_some_and(|f| !f.is_submitting()));
}

#[test]
fn dismissing_a_notification() {
    let mut page = page();
    for (name, value) in [("name", "Ada"), ("email", "ada@example.com")] {
        page.handle_event(PageEvent::FieldInput {
            name: name.into(),
            value: value.into(),
        });
    }
    page.handle_event(PageEvent::Submit);
    page.advance_to(ms(2000));
    let id = page.notification().map(|n| n.id).expect("shown");
    page.drain_mutations();

    page.handle_event(PageEvent::NotificationDismissed { id });
    assert_eq!(
        page.drain_mutations(),
        vec![UiMutation::SetNotificationPhase {
            id,
            phase: NotificationPhase::Exiting
        }]
    );
    page.advance_to(ms(2300));
    assert_eq!(
        page.drain_mutations(),
        vec![UiMutation::RemoveNotification { id }]
    );
}

#[test]
fn same_inputs_same_outputs() {
    let script = |page: &mut Page<StaticLayout>| {
        page.handle_event(PageEvent::DomReady);
        page.handle_event(PageEvent::Loaded);
        page.handle_event(PageEvent::Scroll { offset: 1000.0 });
        page.advance_to(ms(1000));
        for _ in 0..60 {
            page.frame();
        }
        page.handle_event(PageEvent::ButtonClicked {
            button: "hire-me".into(),
        });
        page.advance_to(ms(3000));
        page.drain_mutations()
    };
    let a = script(&mut page());
    let b = script(&mut page());
    assert_eq!(a, b);
}
