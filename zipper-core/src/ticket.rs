// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Abortable, one-shot completion handles for the cooperative scheduler.
//!
//! A [`Ticket`] represents a suspended operation (a channel push, a channel
//! pop, a scheduler timeout) that an external event loop resumes by calling
//! [`Ticket::trigger`]. Unlike an async `Future`'s waker, a `Ticket` is
//! driven synchronously by a cooperative step loop: the scheduler calls
//! `trigger`/`abort` directly and any registered callback runs inline, on
//! the caller's stack, with no polling involved.

use std::cell::RefCell;
use std::rc::Rc;

struct Inner<T> {
    value: Option<T>,
    triggered: bool,
    aborted: bool,
    callbacks: Vec<Box<dyn FnMut(Option<&T>)>>,
}

impl<T> Inner<T> {
    fn new() -> Self {
        Self {
            value: None,
            triggered: false,
            aborted: false,
            callbacks: Vec::new(),
        }
    }
}

/// A one-shot, abortable handle to a suspended operation.
///
/// Tickets are cheap to clone (they share an `Rc`) so both the suspended
/// caller and the scheduler that will eventually resume it can hold a copy.
/// A ticket completes at most once: whichever of [`Ticket::trigger`] or
/// [`Ticket::abort`] runs first wins, and the other becomes a no-op.
pub struct Ticket<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Ticket<T> {
    /// Create a fresh, unresolved ticket.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner::new())),
        }
    }

    /// Resolve the ticket with `value`, running any registered callbacks.
    ///
    /// A no-op if the ticket was already triggered or aborted.
    pub fn trigger(&self, value: T) {
        let mut callbacks = {
            let mut inner = self.inner.borrow_mut();
            if inner.triggered || inner.aborted {
                return;
            }
            inner.triggered = true;
            inner.value = Some(value);
            std::mem::take(&mut inner.callbacks)
        };
        let inner = self.inner.borrow();
        for cb in callbacks.iter_mut() {
            cb(inner.value.as_ref());
        }
    }

    /// Mark the ticket as abandoned.
    ///
    /// A no-op if the ticket was already triggered or aborted. Registered
    /// callbacks still run, but are passed `None` so they can distinguish
    /// abort from completion.
    pub fn abort(&self) {
        let mut callbacks = {
            let mut inner = self.inner.borrow_mut();
            if inner.triggered || inner.aborted {
                return;
            }
            inner.aborted = true;
            std::mem::take(&mut inner.callbacks)
        };
        for cb in callbacks.iter_mut() {
            cb(None);
        }
    }

    /// `true` once [`Self::trigger`] has resolved this ticket.
    #[must_use]
    pub fn triggered(&self) -> bool {
        self.inner.borrow().triggered
    }

    /// `true` once [`Self::abort`] has resolved this ticket.
    #[must_use]
    pub fn aborted(&self) -> bool {
        self.inner.borrow().aborted
    }

    /// `true` once the ticket has reached a terminal state, either way.
    #[must_use]
    pub fn settled(&self) -> bool {
        let inner = self.inner.borrow();
        inner.triggered || inner.aborted
    }

    /// Register a callback to run when the ticket settles.
    ///
    /// Runs immediately, inline, if the ticket has already settled.
    pub fn add_callback<F>(&self, mut f: F)
    where
        F: FnMut(Option<&T>) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        if inner.triggered || inner.aborted {
            f(inner.value.as_ref());
            return;
        }
        inner.callbacks.push(Box::new(f));
    }
}

impl<T: Clone> Ticket<T> {
    /// Clone out the resolved value, if any.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.inner.borrow().value.clone()
    }
}

impl<T> Default for Ticket<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Ticket<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
