//! Change notification.
//!
//! The engine holds plain data and never re-renders anything itself. UI layers
//! register callbacks with [`Observers::subscribe`] and get one
//! [`ChangeEvent`] per successful mutation. Failed operations emit nothing.

use crate::tags::TagMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Entries were added, removed, or had non-tag fields changed.
    DeckChanged,
    /// Tags changed on one or more entries, or in the tag registry.
    TagsChanged,
    /// The edited flag was cleared by an explicit save.
    TagsSaved,
    /// The card cache was replaced.
    CardsReplaced { count: usize },
    TagModeChanged(TagMode),
    UiFlagsChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ChangeEvent)>;

#[derive(Default)]
pub struct Observers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    /// Deliver `event` to every subscriber, in subscription order.
    pub fn emit(&mut self, event: ChangeEvent) {
        for (_, callback) in &mut self.callbacks {
            callback(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}
