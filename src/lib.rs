//! The ShareOxide dashboard's "shorten a link" form.
//!
//! [`SubmissionHandler`] reads the form, posts it to `/api/link` and reloads the
//! page on success. It runs in the browser (the `browser` module, `wasm32`
//! only) and in the terminal (the `terminal` module plus the
//! `shareoxide-shorten` binary).

pub mod api;
pub mod error;
pub mod handler;
pub mod page;
pub mod request;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;

pub use api::{HttpLinkApi, LinkApi};
pub use error::ShortenError;
pub use handler::{Outcome, Submission, SubmissionHandler};
pub use page::{Page, SubmitEvent};
pub use request::{LinkSummary, ShortenRequest};
