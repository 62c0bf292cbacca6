//! External share collaborators.
//!
//! # Responsibility
//! - Define the clipboard and browser seams the share dialog talks to.
//! - Carry asynchronous clipboard results back to the session as events.
//!
//! # Invariants
//! - A clipboard write never blocks the caller; its result arrives later
//!   through the session's completion channel.
//! - Every clipboard request is answered at most once.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::Sender;
use url::Url;

/// Clipboard write failure reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardError(pub String);

impl Display for ClipboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "clipboard write failed: {}", self.0)
    }
}

impl Error for ClipboardError {}

/// Failure while handing a link to the browser.
#[derive(Debug)]
pub enum ShareError {
    /// The share link could not be assembled.
    Link(url::ParseError),
    /// The browser collaborator refused or failed to open the link.
    Browser(String),
}

impl Display for ShareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Link(err) => write!(f, "failed to build share link: {err}"),
            Self::Browser(message) => write!(f, "failed to open share link: {message}"),
        }
    }
}

impl Error for ShareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Link(err) => Some(err),
            Self::Browser(_) => None,
        }
    }
}

impl From<url::ParseError> for ShareError {
    fn from(value: url::ParseError) -> Self {
        Self::Link(value)
    }
}

/// Result of one clipboard request, delivered back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardOutcome {
    pub request_id: u64,
    pub result: Result<(), ClipboardError>,
}

/// Continuation handed to a clipboard backend for one request.
///
/// Backends may call [`ClipboardReply::complete`] from any thread; the
/// session picks the outcome up on its own execution context.
#[derive(Debug)]
pub struct ClipboardReply {
    request_id: u64,
    sender: Sender<ClipboardOutcome>,
}

impl ClipboardReply {
    pub fn new(request_id: u64, sender: Sender<ClipboardOutcome>) -> Self {
        Self { request_id, sender }
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Reports the result. A dropped session simply discards it.
    pub fn complete(self, result: Result<(), ClipboardError>) {
        let _ = self.sender.send(ClipboardOutcome {
            request_id: self.request_id,
            result,
        });
    }
}

/// System clipboard seam.
pub trait Clipboard {
    /// Starts writing `text`; must return without waiting for the write.
    fn write_text(&mut self, text: String, reply: ClipboardReply);
}

/// Opens links in a new browsing context.
pub trait Browser {
    fn open_link(&mut self, link: &Url) -> Result<(), ShareError>;
}

#[cfg(test)]
mod tests {
    use super::{ClipboardError, ClipboardReply};
    use std::sync::mpsc::channel;

    #[test]
    fn reply_delivers_outcome_with_request_id() {
        let (sender, receiver) = channel();
        ClipboardReply::new(7, sender).complete(Err(ClipboardError("denied".to_string())));

        let outcome = receiver.try_recv().unwrap();
        assert_eq!(outcome.request_id, 7);
        assert_eq!(outcome.result, Err(ClipboardError("denied".to_string())));
    }

    #[test]
    fn reply_after_receiver_dropped_is_silent() {
        let (sender, receiver) = channel();
        drop(receiver);
        ClipboardReply::new(1, sender).complete(Ok(()));
    }
}
