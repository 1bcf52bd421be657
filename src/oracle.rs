//! Overflow measurement seam.
//!
//! The fit search never lays text out itself. It asks an [`OverflowOracle`]
//! whether a candidate string overflows the target container. Oracles must be
//! deterministic for a fixed container and candidate, and monotonic over
//! prefix length: once a prefix overflows, every longer prefix overflows too.
//! That precondition is not checked; a violating oracle gives an undefined
//! (but never panicking) result.

use std::ops::Deref;

pub trait OverflowOracle {
    fn overflows(&mut self, candidate: &str) -> bool;
}

impl<F> OverflowOracle for F
where
    F: FnMut(&str) -> bool,
{
    fn overflows(&mut self, candidate: &str) -> bool {
        self(candidate)
    }
}

/// A rendering surface with a fixed size that can report overflow for
/// whatever content it currently holds.
pub trait Container {
    fn content(&self) -> &str;

    /// Installs `content` and returns what was there before.
    fn replace_content(&mut self, content: String) -> String;

    fn is_overflowing(&self) -> bool;
}

/// Holds a candidate inside a container and puts the previous content back
/// when dropped, including during unwinding.
pub struct ContentGuard<'a, C: Container> {
    container: &'a mut C,
    saved: Option<String>,
}

impl<'a, C: Container> ContentGuard<'a, C> {
    pub fn swap(container: &'a mut C, candidate: &str) -> Self {
        let saved = container.replace_content(candidate.to_string());
        Self {
            container,
            saved: Some(saved),
        }
    }
}

impl<C: Container> Deref for ContentGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.container
    }
}

impl<C: Container> Drop for ContentGuard<'_, C> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.container.replace_content(saved);
        }
    }
}

/// Measures candidates by rendering them into a [`Container`], restoring the
/// container's content after every measurement.
pub struct ContainerOracle<'a, C: Container> {
    container: &'a mut C,
    measured: usize,
}

impl<'a, C: Container> ContainerOracle<'a, C> {
    pub fn new(container: &'a mut C) -> Self {
        Self {
            container,
            measured: 0,
        }
    }

    /// Number of candidates measured so far.
    pub fn measured(&self) -> usize {
        self.measured
    }
}

impl<C: Container> OverflowOracle for ContainerOracle<'_, C> {
    fn overflows(&mut self, candidate: &str) -> bool {
        self.measured += 1;
        let guard = ContentGuard::swap(&mut *self.container, candidate);
        let overflowing = guard.is_overflowing();
        tracing::trace!(candidate, overflowing, "measured candidate");
        overflowing
    }
}
