//! Mutable index state with change notification.
//!
//! [`IndexState`] owns an [`InvertedIndex`](crate::index::InvertedIndex) and
//! keeps, next to it, the raw token sequence of every document. Postings drop
//! token order, so phrase matching reads those sequences instead. Every
//! successful `add_document` is announced to the subscribers registered on the
//! state's [`Signal`], in subscription order.
//!
//! [`AutoSaver`] is a ready-made subscriber that persists an engine snapshot
//! to a [`Storage`](crate::storage::Storage) backend on change, loadable with
//! [`SearchEngine::load`](crate::search::SearchEngine::load).

pub mod autosave;
pub mod index_state;
pub mod signal;

pub use autosave::AutoSaver;
pub use index_state::IndexState;
pub use signal::{IndexChange, Signal, Subscriber, SubscriptionId};
