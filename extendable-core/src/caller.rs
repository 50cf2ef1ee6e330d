//! # Caller Context
//!
//! A stack with one [`Frame`] per dispatch hop into an object. The frame is
//! pushed before the target module runs and popped by [`FrameGuard`] when
//! the hop returns or fails, so the stack is empty again once the outermost
//! call completes.
//!
//! Each frame also carries the origin of the external invocation it belongs
//! to. The "last external caller" is the origin recorded by the oldest frame
//! whose caller is not the object itself. For an object entered directly
//! from outside that is the external caller; for an object reached through
//! a chain of other objects it is still the identity that started the chain.

use crate::id::Address;
use std::cell::RefCell;

/// One dispatch hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Immediate invoker of this hop.
    pub caller: Address,
    /// Identity that started the external invocation.
    pub origin: Address,
}

/// Per-object stack of dispatch frames.
#[derive(Debug, Default)]
pub struct CallerStack {
    frames: RefCell<Vec<Frame>>,
}

impl CallerStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `frame` until the returned guard is dropped.
    pub fn push(&self, frame: Frame) -> FrameGuard<'_> {
        self.frames.borrow_mut().push(frame);
        FrameGuard { stack: self }
    }

    /// Number of frames.
    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Whether no hop is in progress.
    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }

    /// The top frame's caller.
    pub fn current_caller(&self) -> Option<Address> {
        self.frames.borrow().last().map(|frame| frame.caller)
    }

    /// The origin recorded by the oldest frame whose caller is not `this`.
    ///
    /// Falls back to the bottom frame's origin when every hop is a self-call.
    pub fn last_external_caller(&self, this: Address) -> Option<Address> {
        let frames = self.frames.borrow();
        frames
            .iter()
            .find(|frame| frame.caller != this)
            .or_else(|| frames.first())
            .map(|frame| frame.origin)
    }

    /// Callers from bottom to top.
    pub fn callers(&self) -> Vec<Address> {
        self.frames.borrow().iter().map(|frame| frame.caller).collect()
    }

    /// Full frames from bottom to top.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.borrow().clone()
    }
}

/// Keeps a frame on its [`CallerStack`]. Pops it on drop.
#[must_use = "the frame is popped as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FrameGuard<'a> {
    stack: &'a CallerStack,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.stack.frames.borrow_mut().pop();
    }
}
