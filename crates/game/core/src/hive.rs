//! The hive: every hostile in the session, grouped by category.
//!
//! The entity count is fixed at construction. Alive views are recomputed by
//! filtering on demand and return [`EntityRef`] copies, never borrows.

use std::collections::BTreeMap;

use crate::category::Category;
use crate::config::HiveComposition;
use crate::entity::{CombatEntity, EntityId, EntityRef, HealthChange};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hive {
    groups: BTreeMap<Category, Vec<CombatEntity>>,
}

impl Hive {
    /// Spawns the hive described by `composition`.
    ///
    /// Ids are assigned sequentially in rank order starting at zero.
    pub fn new(composition: &HiveComposition) -> Self {
        let mut groups = BTreeMap::new();
        let mut next_id = 0u32;

        for category in Category::ALL {
            let count = composition.count(category);
            let members: Vec<CombatEntity> = (0..count)
                .map(|_| {
                    let entity = CombatEntity::new(EntityId(next_id), category);
                    next_id += 1;
                    entity
                })
                .collect();
            groups.insert(category, members);
        }

        Self { groups }
    }

    /// Total entities, dead or alive.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entity record, including dead ones.
    pub fn entities(&self) -> impl Iterator<Item = &CombatEntity> {
        self.groups.values().flatten()
    }

    /// Handles to all living hostiles in rank order.
    pub fn alive(&self) -> Vec<EntityRef> {
        self.entities()
            .filter(|entity| entity.is_alive())
            .map(CombatEntity::entity_ref)
            .collect()
    }

    /// Handles to the living hostiles of one category.
    pub fn alive_by_category(&self, category: Category) -> Vec<EntityRef> {
        self.group(category)
            .iter()
            .filter(|entity| entity.is_alive())
            .map(CombatEntity::entity_ref)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.entities().filter(|entity| entity.is_alive()).count()
    }

    pub fn alive_count_by_category(&self, category: Category) -> usize {
        self.group(category)
            .iter()
            .filter(|entity| entity.is_alive())
            .count()
    }

    pub fn get(&self, entity: EntityRef) -> Option<&CombatEntity> {
        self.group(entity.category)
            .iter()
            .find(|candidate| candidate.id() == entity.id)
    }

    /// Applies one player hit to `entity`.
    ///
    /// Returns `None` if the handle does not belong to this hive.
    pub fn hit(&mut self, entity: EntityRef) -> Option<HealthChange> {
        self.groups
            .get_mut(&entity.category)?
            .iter_mut()
            .find(|candidate| candidate.id() == entity.id)
            .map(CombatEntity::take_hit)
    }

    /// Zeroes every hostile. Returns how many were alive beforehand.
    pub fn kill_all(&mut self) -> usize {
        self.groups
            .values_mut()
            .flatten()
            .map(CombatEntity::eliminate)
            .filter(HealthChange::became_depleted)
            .count()
    }

    fn group(&self, category: Category) -> &[CombatEntity] {
        self.groups
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
