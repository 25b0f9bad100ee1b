// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Handled;
use std::fmt::{Debug, Formatter};

pub type Subscriber<E> = Box<dyn FnMut(&mut E) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of callbacks for one kind of notification. Subscribers run in the order
/// they subscribed.
pub struct SubscriberList<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber<E>)>,
}

impl<E> Default for SubscriberList<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<E> Debug for SubscriberList<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberList")
            .field("len", &self.subscribers.len())
            .finish()
    }
}

impl<E> SubscriberList<E> {
    pub fn subscribe(&mut self, subscriber: impl FnMut(&mut E) + Send + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(it, _)| *it != id);
        before != self.subscribers.len()
    }

    /// Calls every subscriber, for notifications that can't be cancelled.
    pub fn notify(&mut self, event: &mut E) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.subscribers.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.subscribers.is_empty() }
}

impl<E: Handled> SubscriberList<E> {
    /// Calls subscribers in order until one marks the event handled. Returns whether
    /// one did.
    pub fn raise(&mut self, event: &mut E) -> bool {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(event);
            if event.is_handled() {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Key, KeyEvent};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[test]
    fn raise_stops_at_first_handler() {
        let seen = Arc::new(Mutex::new(vec![]));
        let mut list = SubscriberList::<KeyEvent>::default();
        for (name, handles) in [("a", false), ("b", true), ("c", false)] {
            let seen = Arc::clone(&seen);
            list.subscribe(move |event| {
                seen.lock().unwrap().push(name);
                event.handled = handles;
            });
        }

        let mut event = KeyEvent::new(Key::char('x'));
        assert!(list.raise(&mut event));
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn unsubscribe() {
        let mut list = SubscriberList::<KeyEvent>::default();
        let id = list.subscribe(|event| event.handled = true);
        assert_eq!(list.len(), 1);
        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        assert!(list.is_empty());
        assert!(!list.raise(&mut KeyEvent::new(Key::char('x'))));
    }

    #[test]
    fn notify_reaches_everyone() {
        let mut list = SubscriberList::<u32>::default();
        list.subscribe(|it| *it += 1);
        list.subscribe(|it| *it += 10);
        let mut total = 0;
        list.notify(&mut total);
        assert_eq!(total, 11);
    }
}
