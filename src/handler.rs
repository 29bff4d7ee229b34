use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::{debug, error, info, instrument};

use crate::{
    api::LinkApi,
    page::{Page, SubmitEvent, LINK_INPUT_ID, SHORTLINK_INPUT_ID},
    request::ShortenRequest,
};

/// How a single form submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No URL was entered, the user was told so and nothing was sent.
    Invalid,
    /// The link was created and the page reloaded.
    Reloaded,
    /// The request failed, the error was logged and the user alerted.
    Failed,
    /// Another submission was still pending, this one was dropped.
    Busy,
}

/// A validated submission waiting to be sent.
#[derive(Debug)]
pub struct Submission {
    request: ShortenRequest,
    _guard: Option<InFlightGuard>,
}

impl Submission {
    pub fn request(&self) -> &ShortenRequest {
        &self.request
    }
}

#[derive(Debug)]
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Turns shorten form submissions into link API calls.
///
/// Duplicate submissions are sent like any other unless
/// [`ignore_duplicate_submissions`](Self::ignore_duplicate_submissions) is enabled.
pub struct SubmissionHandler<P, A> {
    page: P,
    api: A,
    in_flight: Option<Arc<AtomicBool>>,
}

impl<P: Page, A: LinkApi> SubmissionHandler<P, A> {
    pub fn new(page: P, api: A) -> Self {
        Self {
            page,
            api,
            in_flight: None,
        }
    }

    pub fn ignore_duplicate_submissions(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(|| Arc::new(AtomicBool::new(false)));
        self
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Runs a whole submission: [`submit`](Self::submit) followed by [`send`](Self::send).
    pub async fn handle(&self, event: &impl SubmitEvent) -> Outcome {
        match self.submit(event) {
            Ok(submission) => self.send(submission).await,
            Err(outcome) => outcome,
        }
    }

    /// The synchronous half of a submission.
    ///
    /// Always suppresses the event's default action first, then reads and
    /// validates the form. Hosts that dispatch events synchronously must call
    /// this inside the event callback.
    pub fn submit(&self, event: &impl SubmitEvent) -> Result<Submission, Outcome> {
        event.prevent_default();

        let link = self.page.input_value(LINK_INPUT_ID).unwrap_or_default();
        let shortlink = self
            .page
            .input_value(SHORTLINK_INPUT_ID)
            .unwrap_or_default();

        let request = match ShortenRequest::from_form(&link, &shortlink) {
            Ok(request) => request,
            Err(error) => {
                debug!(error = %error, "rejected shorten form");
                self.page.alert(error.user_message());
                return Err(Outcome::Invalid);
            }
        };

        let guard = match &self.in_flight {
            Some(flag) => match InFlightGuard::acquire(flag) {
                Some(guard) => Some(guard),
                None => {
                    debug!("a submission is already pending, ignoring this one");
                    return Err(Outcome::Busy);
                }
            },
            None => None,
        };

        Ok(Submission {
            request,
            _guard: guard,
        })
    }

    /// Sends a submission and reacts to the result.
    #[instrument(skip_all, fields(url = %submission.request.url))]
    pub async fn send(&self, submission: Submission) -> Outcome {
        match self.api.create_link(&submission.request).await {
            Ok(()) => {
                info!(shortcuts = ?submission.request.shortcuts, "link created");
                self.page.reload();
                Outcome::Reloaded
            }
            Err(error) => {
                error!(error = ?error, "failed to shorten URL");
                self.page.alert(error.user_message());
                Outcome::Failed
            }
        }
    }
}
