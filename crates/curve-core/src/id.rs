use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub fn new() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Non-owning handle to a curve at a specific edit revision.
///
/// Query results carry one of these instead of a borrow of the curve. The
/// handle goes stale as soon as the curve is mutated: the revision moves on
/// and `CurveRef` comparisons against the live curve fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CurveRef {
    pub id: EntityId,
    pub revision: u64,
}

/// Identity owned by every curve primitive.
///
/// Cloning mints a fresh id: a clone is a distinct primitive with its own
/// storage, so details computed on the original never validate against it.
#[derive(Debug)]
pub struct CurveIdentity {
    id: EntityId,
    revision: u64,
}

impl CurveIdentity {
    pub fn new() -> Self {
        Self {
            id: EntityId::new(),
            revision: 0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record an in-place edit.
    pub fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn curve_ref(&self) -> CurveRef {
        CurveRef {
            id: self.id,
            revision: self.revision,
        }
    }
}

impl Default for CurveIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CurveIdentity {
    fn clone(&self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn test_touch_invalidates_ref() {
        let mut identity = CurveIdentity::new();
        let before = identity.curve_ref();
        identity.touch();
        assert_eq!(before.id, identity.id());
        assert_ne!(before, identity.curve_ref());
    }

    #[test]
    fn test_clone_is_distinct() {
        let identity = CurveIdentity::new();
        let copy = identity.clone();
        assert_ne!(identity.id(), copy.id());
        assert_eq!(copy.revision(), 0);
    }
}
