use crate::state::EntityId;

use super::raycast::Category;

/// Upper bound on parent hops; deeper chains are treated as rooted at the
/// last entity reached.
pub const MAX_HIERARCHY_DEPTH: usize = 32;

/// Read-only view of the scene hierarchy.
pub trait SceneOracle: Send + Sync {
    fn parent(&self, entity: EntityId) -> Option<EntityId>;

    fn categories(&self, entity: EntityId) -> Category;

    /// Owner recorded on a tagged collider that is not parented under its
    /// player (detached hitboxes).
    fn tagged_owner(&self, _entity: EntityId) -> Option<EntityId> {
        None
    }

    /// Top-most ancestor of `entity` (the entity itself when it has no parent).
    fn root(&self, entity: EntityId) -> EntityId {
        ancestors(self, entity).last().unwrap_or(entity)
    }
}

/// Iterates `entity` followed by its ancestors, closest first.
pub fn ancestors<S>(scene: &S, entity: EntityId) -> impl Iterator<Item = EntityId> + '_
where
    S: SceneOracle + ?Sized,
{
    std::iter::successors(Some(entity), move |current| scene.parent(*current))
        .take(MAX_HIERARCHY_DEPTH + 1)
}
