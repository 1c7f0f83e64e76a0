//! # Pagination Trigger
//!
//! The listing reveals its entries a page at a time. The last rendered entry
//! acts as a sentinel: when the view reports it on screen, the next page is
//! revealed.
//!
//! A [`Sentinel`] owns at most one live binding. Binding a new element
//! detaches the old one first, and a binding fires at most once, so a view
//! that keeps reporting the same element does not keep growing the window.

use log::debug;

/// Identity of the element a sentinel is bound to.
///
/// `revision` changes whenever the displayed list is replaced (new fetch,
/// filter toggled); `index` is the element's position in that list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelId {
    pub revision: u64,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    id: SentinelId,
    fired: bool,
}

#[derive(Debug, Default)]
pub struct Sentinel {
    binding: Option<Binding>,
    attach_count: u64,
}

impl Sentinel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the sentinel to `id`. A no-op when already bound to the same
    /// element; otherwise the previous binding is detached first.
    pub fn attach(&mut self, id: SentinelId) {
        if self.bound_to() == Some(id) {
            return;
        }
        self.detach();
        debug!("Sentinel attached to {:?}", id);
        self.binding = Some(Binding { id, fired: false });
        self.attach_count += 1;
    }

    pub fn detach(&mut self) {
        if let Some(binding) = self.binding.take() {
            debug!("Sentinel detached from {:?}", binding.id);
        }
    }

    pub fn bound_to(&self) -> Option<SentinelId> {
        self.binding.map(|b| b.id)
    }

    /// Reports that `id` is visible. Returns `true` exactly once for the
    /// current binding, and never for an element it is not bound to.
    pub fn observe(&mut self, id: SentinelId) -> bool {
        match self.binding.as_mut() {
            Some(binding) if binding.id == id && !binding.fired => {
                binding.fired = true;
                true
            }
            _ => false,
        }
    }

    /// Total number of bindings ever made (for diagnostics and tests).
    pub fn attach_count(&self) -> u64 {
        self.attach_count
    }
}
