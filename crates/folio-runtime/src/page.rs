#![forbid(unsafe_code)]

//! The page coordinator.
//!
//! [`Page`] is built once from markup, configuration, a layout source, and a
//! submitter. It owns the timer queue and every component, turns
//! [`PageEvent`]s and elapsed time into [`UiMutation`] records, and buffers
//! them until the host drains them.
//!
//! # Driving a page
//!
//! ```
//! use std::time::Duration;
//! use folio_core::geometry::{Region, StaticLayout};
//! use folio_runtime::event::PageEvent;
//! use folio_runtime::markup::PageMarkup;
//! use folio_runtime::page::Page;
//!
//! let markup = PageMarkup {
//!     sections: vec!["home".into()],
//!     ..PageMarkup::default()
//! };
//! let layout = StaticLayout::new(800.0).with_region("home", Region::new(0.0, 800.0));
//! let mut page = Page::with_defaults(markup, layout).unwrap();
//!
//! page.handle_event(PageEvent::DomReady);
//! page.handle_event(PageEvent::Scroll { offset: 40.0 });
//! page.advance_to(Duration::from_millis(16));
//! page.frame();
//! let mutations = page.drain_mutations();
//! assert!(!mutations.is_empty());
//! ```
//!
//! # Ordering
//!
//! Within one call, mutations are appended in the order the work happened.
//! `advance_to` runs due timers in `(deadline, scheduling order)`, and a frame
//! runs the continuations requested before it started.

use std::fmt;
use std::time::Duration;

use folio_core::animation::counter::parse_target;
use folio_core::animation::{
    AnimationEvent, CounterAnimator, CounterFrame, ScrambleFrame, ScrambleTicket, TextScrambler,
    css_delay, stagger_offsets,
};
use folio_core::debounce::Debouncer;
use folio_core::flags::ObserveTags;
use folio_core::geometry::LayoutSource;
use folio_core::mutation::{NotificationKind, StyleProperty, UiClass, UiMutation};
use folio_core::rng::XorShift64;
use folio_core::scroll::ScrollCoordinator;
use folio_core::timer::{ManualTimers, TimerService};
use folio_core::viewport::{ViewportEvent, ViewportObserver};

use crate::config::{ConfigError, PageConfig, ms};
use crate::event::PageEvent;
use crate::filter::{FilterTimer, PortfolioFilter};
use crate::form::ContactForm;
use crate::markup::{MarkupError, PageMarkup};
use crate::nav::{NavMenu, scroll_to_anchor};
use crate::notification::{Notification, NotificationCenter, NotificationTimer};
use crate::submit::{MESSAGE_FAILED, MESSAGE_SENT, SimulatedSubmitter, SubmitPoll, Submitter};

/// Poll cadence for submitters that cannot say when they will resolve.
pub const SUBMIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// Tasks, notices, errors
// ---------------------------------------------------------------------------

/// Deferred work on the page's timer queue.
#[derive(Debug, Clone, PartialEq)]
pub enum PageTask {
    /// The scroll debounce window elapsed.
    ScrollTick,
    /// Next step of the counter on this element.
    CounterFrame(String),
    /// Next frame of the scramble on this element.
    ScrambleFrame(String),
    /// Start the hero title scramble.
    HeroScramble,
    OverlayFade,
    OverlayRemove,
    Filter(FilterTimer),
    RemoveRipple { button: String, ripple: u64 },
    Notification(NotificationTimer),
    /// Check on the in-flight submission.
    PollSubmission,
}

impl From<FilterTimer> for PageTask {
    fn from(timer: FilterTimer) -> Self {
        Self::Filter(timer)
    }
}

impl From<NotificationTimer> for PageTask {
    fn from(timer: NotificationTimer) -> Self {
        Self::Notification(timer)
    }
}

/// Something finished that the host may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PageNotice {
    /// A counter reached its target.
    CounterFinished(String),
    /// A scramble settled on its new text.
    ScrambleFinished {
        target: String,
        ticket: ScrambleTicket,
    },
}

/// Why a page could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    Markup(MarkupError),
    Config(ConfigError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(e) => write!(f, "markup: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Markup(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<MarkupError> for PageError {
    fn from(e: MarkupError) -> Self {
        Self::Markup(e)
    }
}

impl From<ConfigError> for PageError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// The whole interactive page.
pub struct Page<L, S = SimulatedSubmitter> {
    config: PageConfig,
    markup: PageMarkup,
    layout: L,
    submitter: S,
    timers: ManualTimers<PageTask>,
    scroll_debounce: Debouncer<f64>,
    scroll: ScrollCoordinator,
    observer: ViewportObserver,
    counters: CounterAnimator,
    scrambler: TextScrambler<XorShift64>,
    nav: NavMenu,
    filter: PortfolioFilter,
    form: Option<ContactForm>,
    notifications: NotificationCenter,
    scroll_offset: f64,
    next_ripple: u64,
    dom_ready: bool,
    loaded: bool,
    out: Vec<UiMutation>,
    notices: Vec<PageNotice>,
}

impl<L, S> fmt::Debug for Page<L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("now", &self.timers.now())
            .field("scroll_offset", &self.scroll_offset)
            .field("dom_ready", &self.dom_ready)
            .field("loaded", &self.loaded)
            .field("pending_mutations", &self.out.len())
            .finish_non_exhaustive()
    }
}

impl<L: LayoutSource> Page<L> {
    /// Default configuration and a simulated submitter that succeeds.
    pub fn with_defaults(markup: PageMarkup, layout: L) -> Result<Self, PageError> {
        Self::new(markup, PageConfig::default(), layout, SimulatedSubmitter::new())
    }
}

impl<L: LayoutSource, S: Submitter> Page<L, S> {
    /// Build the page.
    ///
    /// Registering observed elements emits their reveal-style classes right
    /// away; they are waiting in [`drain_mutations`](Self::drain_mutations).
    pub fn new(
        markup: PageMarkup,
        config: PageConfig,
        layout: L,
        submitter: S,
    ) -> Result<Self, PageError> {
        markup.validate()?;
        config.validate()?;

        let mut scroll = ScrollCoordinator::new(config.scroll);
        if let Some(navbar) = &markup.navbar {
            scroll = scroll.with_navbar(navbar.clone());
        }
        for section in &markup.sections {
            scroll.add_section(section.clone());
        }
        for (section, link) in markup.navigation_model() {
            if !scroll.link_section(&section, link.clone()) {
                tracing::debug!(section = %section, link = %link, "section already has a nav link");
            }
        }

        let mut observer = ViewportObserver::new(config.observer);
        let mut out = Vec::new();
        for spec in &markup.observed {
            out.extend(observer.observe(spec.id.clone(), spec.tags));
        }

        tracing::debug!(
            sections = markup.sections.len(),
            observed = observer.len(),
            "page built"
        );

        Ok(Self {
            scroll_debounce: Debouncer::new(ms(config.scroll.debounce_ms)),
            scroll,
            observer,
            counters: CounterAnimator::new(config.counter),
            scrambler: TextScrambler::new(config.scramble.clone(), XorShift64::new(config.seed)),
            nav: NavMenu::new(markup.nav_menu.clone(), markup.nav_toggle.clone()),
            filter: PortfolioFilter::new(
                config.filter,
                &markup.filter_buttons,
                &markup.portfolio_items,
            ),
            form: markup.form.as_ref().map(ContactForm::new),
            notifications: NotificationCenter::new(config.notification),
            timers: ManualTimers::new(),
            scroll_offset: 0.0,
            next_ripple: 0,
            dom_ready: false,
            loaded: false,
            out,
            notices: Vec::new(),
            config,
            markup,
            layout,
            submitter,
        })
    }

    // -- accessors ----------------------------------------------------------

    /// Current page time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn markup(&self) -> &PageMarkup {
        &self.markup
    }

    #[must_use]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Mutable layout, for hosts that push geometry updates.
    ///
    /// Follow changes with [`PageEvent::LayoutChanged`] so observed elements
    /// that moved into view are picked up.
    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    #[must_use]
    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub fn submitter_mut(&mut self) -> &mut S {
        &mut self.submitter
    }

    /// Last scroll offset received (clamped to be non-negative).
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    #[must_use]
    pub fn active_link(&self) -> Option<&str> {
        self.scroll.active_link()
    }

    #[must_use]
    pub fn is_revealed(&self, section: &str) -> bool {
        self.scroll.is_revealed(section)
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.nav.is_open()
    }

    #[must_use]
    pub fn active_filter(&self) -> Option<&str> {
        self.filter.active_button()
    }

    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    #[must_use]
    pub fn form(&self) -> Option<&ContactForm> {
        self.form.as_ref()
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Number of frame continuations waiting for the next frame.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.timers.pending_frames()
    }

    /// Whether nothing is scheduled: no timers and no frame requests.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.timers.pending_timers() == 0 && self.timers.pending_frames() == 0
    }

    /// Take every mutation produced since the last drain, in order.
    pub fn drain_mutations(&mut self) -> Vec<UiMutation> {
        std::mem::take(&mut self.out)
    }

    /// Take completion notices produced since the last drain.
    pub fn drain_notices(&mut self) -> Vec<PageNotice> {
        std::mem::take(&mut self.notices)
    }

    // -- driving ------------------------------------------------------------

    /// Apply one input event.
    pub fn handle_event(&mut self, event: PageEvent) {
        let _span = tracing::debug_span!("page_event", kind = event.name()).entered();
        match event {
            PageEvent::DomReady => self.on_dom_ready(),
            PageEvent::Loaded => self.on_loaded(),
            PageEvent::Scroll { offset } => self.on_scroll(offset),
            PageEvent::LayoutChanged => self.check_viewport(),
            PageEvent::NavToggle => {
                let out = self.nav.toggle();
                self.out.extend(out);
            }
            PageEvent::NavLinkClicked { link } => self.on_nav_link(&link),
            PageEvent::AnchorClicked { href } => {
                if let Some(m) = scroll_to_anchor(&self.markup, &href) {
                    self.out.push(m);
                }
            }
            PageEvent::FilterClicked { button } => {
                let out = self.filter.click(&mut self.timers, &button);
                self.out.extend(out);
            }
            PageEvent::FieldInput { name, value } => match self.form.as_mut() {
                Some(form) => self.out.extend(form.input(&name, &value)),
                None => tracing::warn!(field = %name, "input without a contact form"),
            },
            PageEvent::FieldBlur { name } => match self.form.as_mut() {
                Some(form) => self.out.extend(form.blur(&name)),
                None => tracing::warn!(field = %name, "blur without a contact form"),
            },
            PageEvent::Submit => self.on_submit(),
            PageEvent::ButtonClicked { button } => self.on_button(&button),
            PageEvent::NotificationDismissed { id } => {
                let out = self.notifications.dismiss(&mut self.timers, id);
                self.out.extend(out);
            }
        }
    }

    /// Move the clock to `now`, running every timer due by then.
    ///
    /// Times earlier than the current time are ignored.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some(task) = self.timers.pop_due(now) {
            self.run_task(task);
        }
        self.timers.set_now(now);
    }

    /// Move the clock forward by `delta`.
    pub fn advance_by(&mut self, delta: Duration) {
        let target = self.timers.now().saturating_add(delta);
        self.advance_to(target);
    }

    /// Run one rendered frame. Returns the number of continuations run.
    pub fn frame(&mut self) -> usize {
        let batch = self.timers.take_frame();
        let count = batch.len();
        for task in batch {
            self.run_task(task);
        }
        if count > 0 {
            tracing::trace!(count, "frame continuations run");
        }
        count
    }

    fn run_task(&mut self, task: PageTask) {
        match task {
            PageTask::ScrollTick => {
                if let Some(offset) = self.scroll_debounce.fire() {
                    let out = self.scroll.tick(offset, &self.layout);
                    self.out.extend(out);
                }
            }
            PageTask::CounterFrame(id) => {
                let next = PageTask::CounterFrame(id.clone());
                if let Some(frame) = self.counters.on_frame(&mut self.timers, &id, next) {
                    self.push_counter_frame(&id, frame);
                }
            }
            PageTask::ScrambleFrame(id) => {
                let next = PageTask::ScrambleFrame(id.clone());
                if let Some(frame) = self.scrambler.on_frame(&mut self.timers, &id, next) {
                    self.push_scramble_frame(&id, frame);
                }
            }
            PageTask::HeroScramble => self.start_hero_scramble(),
            PageTask::OverlayFade => {
                if let Some(overlay) = &self.markup.loading_overlay {
                    self.out
                        .push(UiMutation::set_style(overlay.clone(), StyleProperty::Opacity, "0"));
                    self.timers
                        .after(ms(self.config.load.overlay_remove_ms), PageTask::OverlayRemove);
                }
            }
            PageTask::OverlayRemove => {
                if let Some(overlay) = &self.markup.loading_overlay {
                    self.out.push(UiMutation::RemoveElement {
                        target: overlay.clone(),
                    });
                }
            }
            PageTask::Filter(timer) => {
                let out = self.filter.on_timer(timer);
                self.out.extend(out);
            }
            PageTask::RemoveRipple { button, ripple } => {
                self.out.push(UiMutation::RemoveRipple {
                    target: button,
                    ripple,
                });
            }
            PageTask::Notification(timer) => {
                let out = self.notifications.on_timer(&mut self.timers, timer);
                self.out.extend(out);
            }
            PageTask::PollSubmission => self.poll_submission(),
        }
    }

    // -- lifecycle ----------------------------------------------------------

    fn on_dom_ready(&mut self) {
        if self.dom_ready {
            tracing::warn!("duplicate DomReady ignored");
            return;
        }
        self.dom_ready = true;
        let out = self.scroll.tick(self.scroll_offset, &self.layout);
        self.out.extend(out);
        self.check_viewport();
    }

    fn on_loaded(&mut self) {
        if self.loaded {
            tracing::warn!("duplicate Loaded ignored");
            return;
        }
        self.loaded = true;

        let offsets = stagger_offsets(
            self.markup.hero_elements.len(),
            ms(self.config.load.hero_stagger_ms),
        );
        for (id, offset) in self.markup.hero_elements.iter().zip(offsets) {
            self.out.push(UiMutation::set_style(
                id.clone(),
                StyleProperty::AnimationDelay,
                css_delay(offset),
            ));
        }

        if self.markup.loading_overlay.is_some() {
            self.timers
                .after(ms(self.config.load.overlay_fade_ms), PageTask::OverlayFade);
        }

        if let Some(hero) = &self.markup.hero_title {
            self.out.push(UiMutation::set_text(hero.id.clone(), ""));
            self.timers
                .after(ms(self.config.load.hero_scramble_ms), PageTask::HeroScramble);
        }

        // Late images may have moved elements into view.
        self.check_viewport();
    }

    fn start_hero_scramble(&mut self) {
        let Some(hero) = &self.markup.hero_title else {
            return;
        };
        let id = hero.id.clone();
        let text = hero.text.clone();
        let frame = self.scrambler.set_text(
            &mut self.timers,
            id.clone(),
            "",
            &text,
            PageTask::ScrambleFrame(id.clone()),
        );
        self.push_scramble_frame(&id, frame);
    }

    // -- scrolling ----------------------------------------------------------

    fn on_scroll(&mut self, offset: f64) {
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        self.scroll_offset = offset;
        self.scroll_debounce
            .call(&mut self.timers, PageTask::ScrollTick, offset);
        self.check_viewport();
    }

    fn check_viewport(&mut self) {
        for event in self.observer.check(self.scroll_offset, &self.layout) {
            match event {
                ViewportEvent::Entered(id) => {
                    self.out.push(UiMutation::add_class(id, UiClass::Visible));
                }
                ViewportEvent::CounterStart(id) => self.start_counter(id),
                ViewportEvent::ProgressAnimate(id) => {
                    self.out.push(UiMutation::add_class(id, UiClass::Animate));
                }
            }
        }
    }

    fn start_counter(&mut self, id: String) {
        let raw = self
            .markup
            .observed
            .iter()
            .find(|o| o.id == id && o.tags.contains(ObserveTags::COUNTER))
            .and_then(|o| o.counter_target.as_deref());
        let Some(target) = raw.and_then(parse_target) else {
            tracing::warn!(id = %id, raw = ?raw, "counter target is not a number");
            return;
        };
        let next = PageTask::CounterFrame(id.clone());
        let frame = self.counters.start(&mut self.timers, id.clone(), target, next);
        self.push_counter_frame(&id, frame);
    }

    fn push_counter_frame(&mut self, id: &str, frame: CounterFrame) {
        self.out.push(frame.mutation);
        if frame.events.contains(&AnimationEvent::Completed) {
            self.notices.push(PageNotice::CounterFinished(id.to_owned()));
        }
    }

    fn push_scramble_frame(&mut self, id: &str, frame: ScrambleFrame) {
        self.out.push(frame.mutation);
        if frame.events.contains(&AnimationEvent::Completed) {
            tracing::debug!(id, "scramble settled");
            self.notices.push(PageNotice::ScrambleFinished {
                target: id.to_owned(),
                ticket: frame.ticket,
            });
        }
    }

    // -- navigation & buttons ------------------------------------------------

    fn on_nav_link(&mut self, link: &str) {
        let Some(href) = self
            .markup
            .nav_links
            .iter()
            .find(|l| l.id == link)
            .map(|l| l.href.clone())
        else {
            tracing::warn!(link, "click on unknown nav link");
            return;
        };
        let out = self.nav.close();
        self.out.extend(out);
        if let Some(m) = scroll_to_anchor(&self.markup, &href) {
            self.out.push(m);
        }
    }

    fn on_button(&mut self, button: &str) {
        let Some(spec) = self.markup.buttons.iter().find(|b| b.id == button) else {
            tracing::warn!(button, "click on unknown button");
            return;
        };
        if spec.is_submit {
            return;
        }
        let ripple = self.next_ripple;
        self.next_ripple = self.next_ripple.wrapping_add(1);
        self.out.push(UiMutation::AppendRipple {
            target: button.to_owned(),
            ripple,
        });
        self.timers.after(
            ms(self.config.load.ripple_ms),
            PageTask::RemoveRipple {
                button: button.to_owned(),
                ripple,
            },
        );
    }

    // -- contact form -------------------------------------------------------

    fn on_submit(&mut self) {
        let Some(form) = self.form.as_mut() else {
            tracing::warn!("submit without a contact form");
            return;
        };
        if form.is_submitting() {
            tracing::warn!("submit ignored: a submission is already in flight");
            return;
        }
        let (out, valid) = form.validate_all();
        self.out.extend(out);
        if !valid {
            tracing::debug!("submit blocked by invalid fields");
            return;
        }
        form.set_submitting(true);
        self.out
            .push(UiMutation::add_class(form.id().to_owned(), UiClass::Loading));
        let data = form.form_data();
        self.submitter.begin(data, self.timers.now());
        tracing::debug!("submission started");
        self.schedule_poll();
    }

    fn schedule_poll(&mut self) {
        let now = self.timers.now();
        let delay = match self.submitter.ready_at() {
            Some(at) => at.saturating_sub(now),
            None => SUBMIT_POLL_INTERVAL,
        };
        self.timers.after(delay, PageTask::PollSubmission);
    }

    fn poll_submission(&mut self) {
        if !self.form.as_ref().is_some_and(ContactForm::is_submitting) {
            return;
        }
        let result = match self.submitter.poll(self.timers.now()) {
            SubmitPoll::Pending => {
                self.schedule_poll();
                return;
            }
            SubmitPoll::Ready(result) => result,
        };
        let Some(form) = self.form.as_mut() else {
            return;
        };
        form.set_submitting(false);
        match result {
            Ok(()) => {
                tracing::debug!("submission succeeded");
                let shown =
                    self.notifications
                        .show(&mut self.timers, NotificationKind::Success, MESSAGE_SENT);
                self.out.extend(shown);
                self.out.extend(form.reset());
            }
            Err(error) => {
                tracing::warn!(%error, "submission failed");
                let shown =
                    self.notifications
                        .show(&mut self.timers, NotificationKind::Error, MESSAGE_FAILED);
                self.out.extend(shown);
            }
        }
        self.out
            .push(UiMutation::remove_class(form.id().to_owned(), UiClass::Loading));
    }
}
