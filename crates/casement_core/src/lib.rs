//! Casement Core
//!
//! Foundational primitives shared by the Casement crates:
//!
//! - **Reactive Properties**: value containers that notify subscribers
//!   synchronously whenever their value changes
//!
//! # Example
//!
//! ```rust
//! use casement_core::Property;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let width = Property::new(800u32);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let seen_clone = seen.clone();
//! let handle = width.subscribe(move |w| seen_clone.borrow_mut().push(*w));
//!
//! width.set(1024);
//! width.set(1024); // unchanged, no notification
//! width.disconnect(handle);
//! width.set(640);
//!
//! assert_eq!(*seen.borrow(), vec![1024]);
//! assert_eq!(width.get(), 640);
//! ```

pub mod property;

pub use property::{
    ConnectionHandle, Property, PropertyReader, WeakProperty, MAX_REENTRANT_NOTIFICATIONS,
};
