//! Ordered, synchronous change notification.

use std::collections::HashMap;

use crate::error::Result;
use crate::index::InvertedIndex;

/// Payload handed to every subscriber after a document has been added.
#[derive(Debug, Clone, Copy)]
pub struct IndexChange<'a> {
    /// Id of the document that was just added.
    pub doc_id: &'a str,
    /// The index after the mutation.
    pub index: &'a InvertedIndex,
    /// Raw token sequences of every document, including the new one.
    pub doc_tokens: &'a HashMap<String, Vec<String>>,
}

/// A change callback.
pub type Subscriber = Box<dyn FnMut(&IndexChange<'_>) -> Result<()> + Send>;

/// Handle returned by [`Signal::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// An ordered list of subscribers.
///
/// Subscribers run synchronously in subscription order. A failing subscriber
/// does not stop the remaining ones: the failure is logged and the first error
/// is returned from [`Signal::emit`] once everyone has been notified.
#[derive(Default)]
pub struct Signal {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("next_id", &self.next_id)
            .field("subscribers", &format!("<{} callbacks>", self.subscribers.len()))
            .finish()
    }
}

impl Signal {
    /// Create a signal with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback at the end of the list.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&IndexChange<'_>) -> Result<()> + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Notify every subscriber of `change`.
    pub fn emit(&mut self, change: &IndexChange<'_>) -> Result<()> {
        let mut first_error = None;
        for (id, callback) in &mut self.subscribers {
            if let Err(error) = callback(change) {
                tracing::warn!(
                    target: "scout::state",
                    subscriber = id.0,
                    doc_id = change.doc_id,
                    error = %error,
                    "Change subscriber failed"
                );
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
