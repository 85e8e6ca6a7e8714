//! Per-thread current context and scoped overrides.
//!
//! Each thread owns one current [`Context`], created lazily with the default
//! settings. [`local_context`] swaps in a modified copy and returns a guard
//! that puts the saved context back when it goes out of scope, including on
//! early returns and during unwinding.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::context::{Context, ContextError, ContextOverrides};

thread_local! {
    static CURRENT: RefCell<Context> = RefCell::new(Context::default());
}

/// A copy of this thread's current context.
pub fn current_context() -> Context {
    CURRENT.with(|current| current.borrow().clone())
}

/// Replace this thread's current context, returning the previous one.
pub fn set_context(ctx: Context) -> Context {
    CURRENT.with(|current| current.replace(ctx))
}

/// Run `f` on this thread's current context in place.
///
/// Not reentrant: calling `with_context`, `set_context` or `local_context`
/// from inside `f` panics on the nested borrow.
pub fn with_context<R>(f: impl FnOnce(&mut Context) -> R) -> R {
    CURRENT.with(|current| f(&mut current.borrow_mut()))
}

/// Reset the sticky flags of this thread's current context.
pub fn clear_flags() {
    with_context(Context::clear_flags);
}

/// Install `overrides` on top of the current context until the returned
/// guard is dropped.
///
/// Invalid overrides are rejected before anything changes.
pub fn local_context(overrides: &ContextOverrides) -> Result<LocalContext, ContextError> {
    let saved = current_context();
    let scoped = overrides.apply_to(&saved)?;
    tracing::trace!(
        precision = scoped.precision(),
        round = %scoped.round(),
        "entering local context"
    );
    set_context(scoped);
    Ok(LocalContext {
        saved: Some(saved),
        _thread_bound: PhantomData,
    })
}

/// Guard returned by [`local_context`].
///
/// Restores the context that was current when it was created, flags
/// included. Bound to the thread that created it.
#[derive(Debug)]
#[must_use = "the previous context is restored as soon as the guard is dropped"]
pub struct LocalContext {
    saved: Option<Context>,
    _thread_bound: PhantomData<*const ()>,
}

impl LocalContext {
    /// The context that will be restored.
    pub fn saved(&self) -> Option<&Context> {
        self.saved.as_ref()
    }

    /// Restore now instead of at the end of the scope.
    pub fn restore(self) {
        drop(self);
    }
}

impl Drop for LocalContext {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            // The slot is gone during thread teardown; nothing to restore then.
            let _ = CURRENT.try_with(|current| {
                if let Ok(mut slot) = current.try_borrow_mut() {
                    *slot = saved;
                }
            });
        }
    }
}
