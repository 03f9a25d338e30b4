//! Mutual exclusion between the edge interrupt and the poller.
//!
//! Two variants, mirroring the two masking scopes the poller needs:
//!
//! - **scoped**: brackets one dispatch step.  It is released before any
//!   user callback runs and taken again to commit the result, so an edge
//!   is never held off for the duration of user code.
//! - **always**: protects the repeat-window read-and-maybe-write.  It is
//!   taken after the scoped section has been released and masks even in
//!   integrations whose scoped guard is a no-op.
//!
//! Sections are closures rather than guard objects so that masking and
//! unmasking always nest correctly.

/// Interrupt-masking strategy for one button.
pub trait Guard {
    /// Run `f` inside the per-dispatch section.
    fn scoped<R>(&self, f: impl FnOnce() -> R) -> R;

    /// Run `f` inside the unconditional section.
    fn always<R>(&self, f: impl FnOnce() -> R) -> R;
}

/// Masks through the global `critical-section` implementation for both
/// variants.  The default for firmware where the edge interrupt can
/// preempt the poller.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalSectionGuard;

impl Guard for CriticalSectionGuard {
    #[inline]
    fn scoped<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }

    #[inline]
    fn always<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }
}

/// For integrations where poller and edge handler never preempt each
/// other: the scoped section is free, the always section still masks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleContextGuard;

impl Guard for SingleContextGuard {
    #[inline]
    fn scoped<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }

    #[inline]
    fn always<R>(&self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }
}
