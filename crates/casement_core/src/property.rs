//! Reactive properties
//!
//! A [`Property<T>`] is a value plus an ordered list of subscribers. Setting a
//! new value invokes every subscriber synchronously, in subscription order.
//! Subscriptions are identified by [`ConnectionHandle`]s which can be used to
//! disconnect or temporarily block a single subscriber.
//!
//! Notifications are reentrant: a subscriber may set other properties, or
//! the property that is currently notifying. In the latter case the new value
//! is stored immediately and subscribers are notified again once the current
//! pass finishes, up to [`MAX_REENTRANT_NOTIFICATIONS`] passes.
//!
//! ```ignore
//! let visible = Property::new(false);
//! let handle = visible.subscribe(|v| println!("visible: {v}"));
//!
//! visible.set(true);          // prints "visible: true"
//! visible.block(handle);
//! visible.set(false);         // silent
//! visible.unblock(handle);
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Upper bound on notification passes triggered by a single `set`
///
/// A subscriber that keeps changing the property it observes would otherwise
/// never settle.
pub const MAX_REENTRANT_NOTIFICATIONS: u32 = 32;

new_key_type! {
    /// Identifies one subscription on a [`Property`]
    pub struct ConnectionHandle;
}

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Connection<T> {
    callback: Callback<T>,
    blocked: bool,
}

struct PropertyInner<T> {
    value: RefCell<T>,
    connections: RefCell<SlotMap<ConnectionHandle, Connection<T>>>,
    /// Subscription order (slot order is not insertion order once slots are reused)
    order: RefCell<SmallVec<[ConnectionHandle; 4]>>,
    notifying: Cell<bool>,
    pending: Cell<bool>,
}

impl<T: 'static> PropertyInner<T> {
    fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            connections: RefCell::new(SlotMap::with_key()),
            order: RefCell::new(SmallVec::new()),
            notifying: Cell::new(false),
            pending: Cell::new(false),
        }
    }

    fn notify(&self)
    where
        T: Clone,
    {
        if self.notifying.get() {
            // Picked up by the pass that is already running
            self.pending.set(true);
            return;
        }

        self.notifying.set(true);
        let mut rounds = 0u32;

        loop {
            rounds += 1;

            // Callbacks get a snapshot so they are free to set the property again
            let value = self.value.borrow().clone();
            let handles = self.order.borrow().clone();

            for handle in handles {
                let callback = match self.connections.borrow().get(handle) {
                    Some(connection) if !connection.blocked => connection.callback.clone(),
                    _ => continue,
                };
                (&mut *callback.borrow_mut())(&value);
            }

            if !self.pending.replace(false) {
                break;
            }

            if rounds >= MAX_REENTRANT_NOTIFICATIONS {
                tracing::warn!(
                    rounds,
                    "property notifications did not settle, dropping further change notifications"
                );
                break;
            }
        }

        self.notifying.set(false);
    }
}

/// A value container that notifies subscribers when it changes
pub struct Property<T> {
    inner: Rc<PropertyInner<T>>,
}

impl<T: 'static> Property<T> {
    /// Create a property holding `value`
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(PropertyInner::new(value)),
        }
    }

    /// Borrow the current value
    ///
    /// The property must not be set from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Subscribe to value changes
    ///
    /// Subscribers run synchronously, in the order they subscribed. A
    /// subscription added while a notification is running takes part in the
    /// next notification.
    pub fn subscribe<F>(&self, callback: F) -> ConnectionHandle
    where
        F: FnMut(&T) + 'static,
    {
        let callback: Callback<T> = Rc::new(RefCell::new(callback));
        let handle = self.inner.connections.borrow_mut().insert(Connection {
            callback,
            blocked: false,
        });
        self.inner.order.borrow_mut().push(handle);
        handle
    }

    /// Remove a subscription
    ///
    /// Returns `false` if the handle does not belong to a live subscription.
    pub fn disconnect(&self, handle: ConnectionHandle) -> bool {
        let removed = self.inner.connections.borrow_mut().remove(handle).is_some();
        if removed {
            self.inner.order.borrow_mut().retain(|h| *h != handle);
        }
        removed
    }

    /// Remove every subscription
    pub fn disconnect_all(&self) {
        self.inner.connections.borrow_mut().clear();
        self.inner.order.borrow_mut().clear();
    }

    /// Suppress a subscription until [`unblock`](Self::unblock) is called
    ///
    /// Returns `false` if the handle is unknown.
    pub fn block(&self, handle: ConnectionHandle) -> bool {
        self.set_blocked(handle, true)
    }

    /// Re-enable a blocked subscription
    pub fn unblock(&self, handle: ConnectionHandle) -> bool {
        self.set_blocked(handle, false)
    }

    /// Whether the subscription is currently blocked
    pub fn is_blocked(&self, handle: ConnectionHandle) -> bool {
        self.inner
            .connections
            .borrow()
            .get(handle)
            .map_or(false, |c| c.blocked)
    }

    /// Whether `handle` refers to a live subscription on this property
    pub fn is_connected(&self, handle: ConnectionHandle) -> bool {
        self.inner.connections.borrow().contains_key(handle)
    }

    /// Number of live subscriptions
    pub fn connection_count(&self) -> usize {
        self.inner.connections.borrow().len()
    }

    /// Read-only view sharing this property's value
    ///
    /// The reader keeps the value alive, so it stays valid after the
    /// property itself is dropped and then reports the last value.
    pub fn reader(&self) -> PropertyReader<T> {
        PropertyReader {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Non-owning view, used by subscribers that need to read a sibling property
    pub fn downgrade(&self) -> WeakProperty<T> {
        WeakProperty {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn set_blocked(&self, handle: ConnectionHandle, blocked: bool) -> bool {
        match self.inner.connections.borrow_mut().get_mut(handle) {
            Some(connection) => {
                connection.blocked = blocked;
                true
            }
            None => false,
        }
    }
}

impl<T: Clone + 'static> Property<T> {
    /// Get a copy of the current value
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Notify subscribers with the current value without changing it
    pub fn emit(&self) {
        self.inner.notify();
    }
}

impl<T: Clone + PartialEq + 'static> Property<T> {
    /// Set the value, notifying subscribers if it changed
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.inner.notify();
        true
    }

    /// Modify the value in place, notifying subscribers if it changed
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut value = self.get();
        f(&mut value);
        self.set(value)
    }
}

impl<T: Default + 'static> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> From<T> for Property<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Property");
        match self.inner.value.try_borrow() {
            Ok(value) => s.field("value", &*value),
            Err(_) => s.field("value", &"<borrowed>"),
        };
        s.field("connections", &self.inner.order.borrow().len())
            .finish()
    }
}

/// Read-only view of a [`Property`]
pub struct PropertyReader<T> {
    inner: Rc<PropertyInner<T>>,
}

impl<T> Clone for PropertyReader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> PropertyReader<T> {
    /// Borrow the current value
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }
}

impl<T: Clone + 'static> PropertyReader<T> {
    /// Get a copy of the current value
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for PropertyReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyReader")
            .field(&self.inner.value.try_borrow().ok())
            .finish()
    }
}

/// Weak, read-only view of a [`Property`]
pub struct WeakProperty<T> {
    inner: Weak<PropertyInner<T>>,
}

impl<T> Clone for WeakProperty<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: 'static> WeakProperty<T> {
    /// Upgrade to a reader if the property (or another reader) is still alive
    pub fn upgrade(&self) -> Option<PropertyReader<T>> {
        self.inner.upgrade().map(|inner| PropertyReader { inner })
    }
}

impl<T: Clone + 'static> WeakProperty<T> {
    /// Current value, or `None` once the property is gone
    pub fn get(&self) -> Option<T> {
        self.inner.upgrade().map(|inner| inner.value.borrow().clone())
    }
}

impl<T> fmt::Debug for WeakProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakProperty")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
