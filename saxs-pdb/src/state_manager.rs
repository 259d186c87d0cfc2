use std::cell::RefCell;
use std::rc::Rc;

/// Shared, interior-mutable bookkeeping of which bodies of a [`crate::Molecule`] changed.
///
/// A [`Molecule`](crate::Molecule) owns one `StateManager` and hands each [`crate::Body`]
/// a [`Signaller`] that reports back into it. The partial-histogram manager (in
/// `saxs-hist`) reads this state to decide which block of the inter-body distance
/// matrix must be recomputed, then calls [`StateManager::reset_to_false`].
pub struct StateManager {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    externally_modified: Vec<bool>,
    internally_modified: Vec<bool>,
    symmetry_modified: Vec<Vec<bool>>,
    modified_hydration: bool,
}

impl StateManager {
    /// Creates a manager tracking `n_bodies`, all initially modified (forces a full
    /// histogram computation the first time it is consulted).
    pub fn new(n_bodies: usize) -> Self {
        StateManager {
            inner: Rc::new(RefCell::new(Inner {
                externally_modified: vec![true; n_bodies],
                internally_modified: vec![true; n_bodies],
                symmetry_modified: vec![vec![true; n_bodies]; n_bodies],
                modified_hydration: true,
            })),
        }
    }

    pub fn size(&self) -> usize { self.inner.borrow().externally_modified.len() }

    /// Returns a [`Signaller`] bound to body `body_index`, to be stored on that body.
    pub fn signaller(&self, body_index: usize) -> Signaller {
        Signaller { body_index, inner: self.inner.clone() }
    }

    pub fn is_externally_modified(&self, i: usize) -> bool { self.inner.borrow().externally_modified[i] }
    pub fn is_internally_modified(&self, i: usize) -> bool { self.inner.borrow().internally_modified[i] }
    pub fn is_modified_symmetry(&self, i: usize, j: usize) -> bool { self.inner.borrow().symmetry_modified[i][j] }
    pub fn is_modified_hydration(&self) -> bool { self.inner.borrow().modified_hydration }

    /// Returns true if any body, any symmetry pair, or the hydration layer changed.
    pub fn is_modified(&self) -> bool {
        let inner = self.inner.borrow();
        inner.modified_hydration
            || inner.externally_modified.iter().any(|&b| b)
            || inner.internally_modified.iter().any(|&b| b)
            || inner.symmetry_modified.iter().any(|row| row.iter().any(|&b| b))
    }

    /// Clears every dirty bit, to be called once a recompute has consumed them.
    pub fn reset_to_false(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.externally_modified.iter_mut().for_each(|b| *b = false);
        inner.internally_modified.iter_mut().for_each(|b| *b = false);
        inner.symmetry_modified.iter_mut().for_each(|row| row.iter_mut().for_each(|b| *b = false));
        inner.modified_hydration = false;
    }
}

/// A body's back-reference into its [`StateManager`], used to report mutations.
#[derive(Clone)]
pub struct Signaller {
    body_index: usize,
    inner: Rc<RefCell<Inner>>,
}

impl Signaller {
    /// A body's own coordinates were replaced (e.g. by a rigid-body move).
    pub fn internal_change(&self) { self.inner.borrow_mut().internally_modified[self.body_index] = true; }

    /// A body external to this one changed in a way that invalidates cross terms
    /// involving this body (kept separate from `internal_change` so the partial
    /// manager can tell "this body moved" from "my neighbour moved" apart).
    pub fn external_change(&self) { self.inner.borrow_mut().externally_modified[self.body_index] = true; }

    /// This body's hydration shell was regenerated or rescaled.
    pub fn modified_hydration(&self) { self.inner.borrow_mut().modified_hydration = true; }

    /// The symmetry descriptor relating this body to body `j` changed.
    pub fn modified_symmetry(&self, j: usize) {
        let mut inner = self.inner.borrow_mut();
        inner.symmetry_modified[self.body_index][j] = true;
        inner.symmetry_modified[j][self.body_index] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_manager_is_fully_dirty() {
        let mgr = StateManager::new(3);
        assert!(mgr.is_modified());
        for i in 0..3 { assert!(mgr.is_externally_modified(i)); }
    }

    #[test]
    fn test_reset_clears_everything() {
        let mgr = StateManager::new(2);
        mgr.reset_to_false();
        assert!(!mgr.is_modified());
        let sig = mgr.signaller(0);
        sig.internal_change();
        assert!(mgr.is_internally_modified(0));
        assert!(!mgr.is_internally_modified(1));
        assert!(mgr.is_modified());
    }

    #[test]
    fn test_symmetry_signal_is_symmetric() {
        let mgr = StateManager::new(3);
        mgr.reset_to_false();
        mgr.signaller(0).modified_symmetry(2);
        assert!(mgr.is_modified_symmetry(0, 2));
        assert!(mgr.is_modified_symmetry(2, 0));
        assert!(!mgr.is_modified_symmetry(0, 1));
    }

    #[test]
    fn test_hydration_signal() {
        let mgr = StateManager::new(1);
        mgr.reset_to_false();
        mgr.signaller(0).modified_hydration();
        assert!(mgr.is_modified_hydration());
    }
}
