#![forbid(unsafe_code)]

//! Runtime: the interactive behavior of a single-page portfolio site.
//!
//! [`page::Page`] wires the `folio-core` primitives to page markup. The host
//! forwards [`event::PageEvent`]s, advances time, runs frames, and applies the
//! resulting [`folio_core::mutation::UiMutation`]s to the real document.
//!
//! Components are usable on their own as well: [`filter::PortfolioFilter`],
//! [`form::ContactForm`], [`notification::NotificationCenter`], and
//! [`nav::NavMenu`] each take a timer service and return mutations.

pub mod config;
pub mod event;
pub mod filter;
pub mod form;
pub mod markup;
pub mod nav;
pub mod notification;
pub mod page;
pub mod submit;
pub mod validation;

pub use config::{ConfigError, PageConfig};
pub use event::PageEvent;
pub use markup::{MarkupError, PageMarkup};
pub use page::{Page, PageError, PageNotice, PageTask};
pub use submit::{SimulatedSubmitter, SubmissionError, Submitter};
