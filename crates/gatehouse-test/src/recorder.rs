//! Middleware that records what it sees.
//!
//! A [`RecordingMiddleware`] stands in for an integrator stage (`logging`,
//! `auth`, ...) and writes an entry to a shared [`VisitLog`] on the way in
//! and on the way out, which makes the onion order of a chain observable.

use gatehouse_core::CallerIdentity;
use gatehouse_middleware::{Middleware, MiddlewareContext, Next, Request, Response, ResponseExt};
use http::StatusCode;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Direction of a recorded visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The middleware received the request.
    Enter,
    /// The middleware returned its response.
    Exit,
}

/// One entry of a [`VisitLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// Name of the middleware.
    pub name: String,
    /// Request path.
    pub path: String,
    /// In or out.
    pub phase: Phase,
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.phase {
            Phase::Enter => '>',
            Phase::Exit => '<',
        };
        write!(f, "{arrow}{}", self.name)
    }
}

/// Visits shared between recorders and the test body.
#[derive(Debug, Clone, Default)]
pub struct VisitLog {
    visits: Arc<Mutex<Vec<Visit>>>,
}

impl VisitLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a visit.
    pub fn record(&self, visit: Visit) {
        self.visits.lock().push(visit);
    }

    /// Returns a copy of every visit, in order.
    pub fn visits(&self) -> Vec<Visit> {
        self.visits.lock().clone()
    }

    /// Returns the names of the middleware that received a request, in
    /// order.
    pub fn entered(&self) -> Vec<String> {
        self.visits
            .lock()
            .iter()
            .filter(|v| v.phase == Phase::Enter)
            .map(|v| v.name.clone())
            .collect()
    }

    /// Returns the visits formatted as `>name` / `<name`.
    pub fn trace(&self) -> Vec<String> {
        self.visits.lock().iter().map(ToString::to_string).collect()
    }

    /// Removes every visit.
    pub fn clear(&self) {
        self.visits.lock().clear();
    }

    /// Returns the number of visits.
    pub fn len(&self) -> usize {
        self.visits.lock().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.visits.lock().is_empty()
    }
}

/// A named middleware that records its visits and can optionally
/// establish an identity or answer on its own.
///
/// # Example
///
/// ```
/// use gatehouse_middleware::{Chain, SharedMiddleware};
/// use gatehouse_test::{RecordingMiddleware, TestRequest, VisitLog};
/// use std::sync::Arc;
///
/// let log = VisitLog::new();
/// let outer: SharedMiddleware = Arc::new(RecordingMiddleware::new("outer", &log));
/// let inner: SharedMiddleware = Arc::new(RecordingMiddleware::new("inner", &log));
/// let chain = Chain::from_middlewares(vec![outer, inner]);
///
/// TestRequest::get("/").build().unwrap().run(&chain);
/// assert_eq!(log.trace(), vec![">outer", ">inner", "<inner", "<outer"]);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingMiddleware {
    name: String,
    log: VisitLog,
    identity: Option<CallerIdentity>,
    short_circuit: Option<StatusCode>,
}

impl RecordingMiddleware {
    /// Creates a pass-through recorder writing to `log`.
    pub fn new(name: impl Into<String>, log: &VisitLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            identity: None,
            short_circuit: None,
        }
    }

    /// Sets `identity` on the context before passing the request on, the
    /// way an `auth` stage would.
    pub fn with_identity(mut self, identity: CallerIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Answers with `status` instead of calling the rest of the chain.
    pub fn short_circuit(mut self, status: StatusCode) -> Self {
        self.short_circuit = Some(status);
        self
    }

    fn visit(&self, path: &str, phase: Phase) {
        self.log.record(Visit {
            name: self.name.clone(),
            path: path.to_string(),
            phase,
        });
    }
}

impl Middleware for RecordingMiddleware {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, ctx: &mut MiddlewareContext, request: Request, next: Next<'_>) -> Response {
        let path = request.uri().path().to_string();
        self.visit(&path, Phase::Enter);

        if let Some(identity) = &self.identity {
            ctx.set_identity(identity.clone());
        }

        let response = match self.short_circuit {
            Some(status) => Response::error(status, &self.name),
            None => next.run(ctx, request),
        };

        self.visit(&path, Phase::Exit);
        response
    }
}
