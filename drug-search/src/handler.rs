//! SearchHandler – binds one activation of the search control to one request and renders the
//! outcome into the page's result container.
//!
//! ## Activation cycle
//! 1. Read the query field **at activation time** and trim it.
//! 2. Empty query: raise the blocking notice and stop. No request is sent.
//! 3. Post `{"brand_drug": <query>}` through the [`SearchTransport`], exactly once.
//! 4. Map the reply onto the result container:
//!    * 2xx: parse the body, render the result boxes, replace the container with the markup.
//!    * other status: replace the container with [`HTTP_ERROR_TEXT`].
//!    * transport/parse/render failure: replace the container with [`GENERIC_ERROR_TEXT`] and
//!      log the detail at error level.
//!
//! ## Overlapping activations
//! Activating again while a request is in flight is allowed and issues a second request. Each
//! activation takes a ticket when its request is issued; only the holder of the newest ticket
//! may write the container. An older activation that settles later is dropped and reports
//! [`Activation::Superseded`], so the container always shows the latest activation's outcome
//! whatever order the replies arrive in.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use tracing::{debug, error, info};

use crate::{
    error::{EMPTY_QUERY_NOTICE, GENERIC_ERROR_TEXT, HTTP_ERROR_TEXT, Result, SearchError},
    page::Page,
    payload::{DrugInfo, SearchRequest},
    render::render_info,
    transport::{SearchReply, SearchTransport},
};

/// Trimmed, non-empty query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    Idle,
    Pending,
}

/// What a single activation did to the page
#[derive(Debug)]
pub enum Activation {
    /// Empty query; the notice was raised and nothing was sent
    Rejected,
    /// Result boxes were rendered
    Rendered,
    /// An error text was rendered
    Failed(SearchError),
    /// A newer activation was issued before this one settled; the page was left alone
    Superseded,
}

/// Search handler wired to a page and a transport.
///
/// Cloning is cheap and clones share the ticket counter, so clones handed to different event
/// sources still agree on which activation is the latest.
#[derive(Clone)]
pub struct SearchHandler {
    page: Arc<dyn Page>,
    transport: Arc<dyn SearchTransport>,
    /// Newest issued ticket. Held while a settled activation writes the page, so issuing and
    /// writing never interleave.
    latest_ticket: Arc<Mutex<u64>>,
    in_flight: Arc<AtomicUsize>,
}

impl SearchHandler {
    pub fn new(page: Arc<dyn Page>, transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            page,
            transport,
            latest_ticket: Arc::new(Mutex::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> HandlerState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            HandlerState::Pending
        } else {
            HandlerState::Idle
        }
    }

    /// Run one activation against the current contents of the query field
    pub async fn activate(&self) -> Activation {
        let query = match Query::parse(&self.page.query_value()) {
            Ok(query) => query,
            Err(_) => {
                self.page.alert(EMPTY_QUERY_NOTICE);
                return Activation::Rejected;
            }
        };

        let ticket = self.issue_ticket();
        info!(ticket, query = query.as_str(), "Search activated");

        let outcome = {
            let _pending = PendingGuard::enter(&self.in_flight);
            self.search(&query).await
        };

        let latest = self.latest_ticket.lock().unwrap_or_else(PoisonError::into_inner);
        if *latest != ticket {
            debug!(ticket, "Dropping reply from superseded activation");
            return Activation::Superseded;
        }

        match outcome {
            Ok(markup) => {
                self.page.set_markup(markup);
                Activation::Rendered
            }
            Err(e @ SearchError::Http(_)) => {
                debug!(ticket, "Search endpoint rejected request: {}", e);
                self.page.set_text(HTTP_ERROR_TEXT.to_string());
                Activation::Failed(e)
            }
            Err(e) => {
                error!(ticket, error = %e, "Drug search failed");
                self.page.set_text(GENERIC_ERROR_TEXT.to_string());
                Activation::Failed(e)
            }
        }
    }

    fn issue_ticket(&self) -> u64 {
        let mut latest = self.latest_ticket.lock().unwrap_or_else(PoisonError::into_inner);
        *latest += 1;
        *latest
    }

    async fn search(&self, query: &Query) -> Result<String> {
        let request = SearchRequest::new(query.as_str());

        match self.transport.post_search(&request).await? {
            SearchReply::Success(body) => {
                let info = DrugInfo::from_json(&body)?;
                render_info(&info)
            }
            SearchReply::Failure(status) => Err(SearchError::Http(status)),
        }
    }
}

/// Counts an activation as in flight until dropped, even if the activation future is abandoned
struct PendingGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> PendingGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
