//! Event receivers
//!
//! Receivers are external objects that opt in to a copy of every event a
//! window dispatches, independently of its [`WindowHandler`](crate::WindowHandler).
//! Windows only hold weak references: a receiver that is dropped simply
//! stops receiving events.

use casement_platform::{Event, WindowId};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Something that can observe window events
pub trait EventReceiver {
    /// Called with the id of the window the event was targeted at
    fn event(&mut self, target: WindowId, event: &Event);
}

impl<F> EventReceiver for F
where
    F: FnMut(WindowId, &Event),
{
    fn event(&mut self, target: WindowId, event: &Event) {
        self(target, event)
    }
}

type ReceiverRef = Weak<RefCell<dyn EventReceiver>>;

/// Ordered set of receivers, keyed by allocation identity
#[derive(Default)]
pub(crate) struct ReceiverList {
    entries: SmallVec<[ReceiverRef; 4]>,
}

impl ReceiverList {
    /// Returns `false` if the receiver was already registered
    pub fn register<R>(&mut self, receiver: &Rc<RefCell<R>>) -> bool
    where
        R: EventReceiver + 'static,
    {
        self.prune();
        if self.position(receiver).is_some() {
            return false;
        }
        let receiver: Rc<RefCell<dyn EventReceiver>> = receiver.clone();
        self.entries.push(Rc::downgrade(&receiver));
        true
    }

    /// Returns `false` if the receiver was not registered
    pub fn unregister<R>(&mut self, receiver: &Rc<RefCell<R>>) -> bool
    where
        R: EventReceiver + 'static,
    {
        match self.position(receiver) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains<R>(&self, receiver: &Rc<RefCell<R>>) -> bool
    where
        R: EventReceiver + 'static,
    {
        self.position(receiver).is_some()
    }

    /// Number of receivers that are still alive
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|r| r.strong_count() > 0).count()
    }

    /// Deliver `event` to every live receiver, in registration order
    pub fn dispatch(&mut self, target: WindowId, event: &Event) {
        self.prune();

        // Upgrade up front so delivery is unaffected by receivers dropping each other
        let receivers: SmallVec<[Rc<RefCell<dyn EventReceiver>>; 4]> =
            self.entries.iter().filter_map(Weak::upgrade).collect();

        for receiver in receivers {
            match receiver.try_borrow_mut() {
                Ok(mut receiver) => receiver.event(target, event),
                Err(_) => {
                    tracing::warn!(%target, kind = ?event.kind(), "event receiver is busy, skipping delivery")
                }
            }
        }
    }

    fn position<R>(&self, receiver: &Rc<RefCell<R>>) -> Option<usize>
    where
        R: EventReceiver + 'static,
    {
        let addr = Rc::as_ptr(receiver) as *const ();
        self.entries
            .iter()
            .position(|entry| entry.as_ptr() as *const () == addr)
    }

    fn prune(&mut self) {
        self.entries.retain(|entry| entry.strong_count() > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<(WindowId, Event)>,
    }

    impl EventReceiver for Recorder {
        fn event(&mut self, target: WindowId, event: &Event) {
            self.events.push((target, event.clone()));
        }
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut list = ReceiverList::default();
        let receiver = Rc::new(RefCell::new(Recorder::default()));

        assert!(list.register(&receiver));
        assert!(!list.register(&receiver));
        assert_eq!(list.len(), 1);

        let id = WindowId::next();
        list.dispatch(id, &Event::mouse_wheel(0, 1));
        assert_eq!(receiver.borrow().events.len(), 1);
    }

    #[test]
    fn test_register_unregister_roundtrip() {
        let mut list = ReceiverList::default();
        let kept = Rc::new(RefCell::new(Recorder::default()));
        let transient = Rc::new(RefCell::new(Recorder::default()));

        list.register(&kept);
        assert!(list.register(&transient));
        assert!(list.unregister(&transient));
        assert!(!list.unregister(&transient));

        assert!(list.contains(&kept));
        assert!(!list.contains(&transient));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let mut list = ReceiverList::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        let receivers: Vec<_> = (0..3)
            .map(|i| {
                let order = order.clone();
                Rc::new(RefCell::new(move |_: WindowId, _: &Event| {
                    order.borrow_mut().push(i)
                }))
            })
            .collect();
        for receiver in receivers.iter().rev() {
            list.register(receiver);
        }

        list.dispatch(WindowId::next(), &Event::resize(1, 1));
        assert_eq!(*order.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn test_dropped_receiver_is_skipped() {
        let mut list = ReceiverList::default();
        let kept = Rc::new(RefCell::new(Recorder::default()));
        let dropped = Rc::new(RefCell::new(Recorder::default()));

        list.register(&dropped);
        list.register(&kept);
        drop(dropped);

        assert_eq!(list.len(), 1);
        list.dispatch(WindowId::next(), &Event::mouse_move(3, 4));
        assert_eq!(kept.borrow().events.len(), 1);
    }

    #[test]
    fn test_busy_receiver_is_skipped() {
        let mut list = ReceiverList::default();
        let receiver = Rc::new(RefCell::new(Recorder::default()));
        list.register(&receiver);

        let guard = receiver.borrow_mut();
        list.dispatch(WindowId::next(), &Event::mouse_move(0, 0));
        drop(guard);

        assert!(receiver.borrow().events.is_empty());
    }
}
