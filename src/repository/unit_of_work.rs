//! Snapshot of all collections for one read-modify-write cycle

use std::collections::BTreeSet;

use super::{encode, not_found, Collection, Documents, Record};
use crate::{
    error::AppResult,
    models::{Equipment, MaintenanceRequest, Team, User},
};

pub struct UnitOfWork {
    users: Vec<User>,
    teams: Vec<Team>,
    equipment: Vec<Equipment>,
    requests: Vec<MaintenanceRequest>,
    dirty: BTreeSet<Collection>,
}

/// Lookup and insertion helpers shared by every collection
macro_rules! collection_access {
    ($field:ident, $ty:ty, $get:ident, $get_mut:ident, $find:ident, $insert:ident) => {
        pub fn $field(&self) -> &[$ty] {
            &self.$field
        }

        pub fn $find(&self, id: &str) -> Option<&$ty> {
            self.$field.iter().find(|r| r.id == id)
        }

        pub fn $get(&self, id: &str) -> AppResult<&$ty> {
            self.$find(id).ok_or_else(|| not_found::<$ty>(id))
        }

        /// Mutable access; marks the collection for saving
        pub fn $get_mut(&mut self, id: &str) -> AppResult<&mut $ty> {
            let record = self
                .$field
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| not_found::<$ty>(id))?;
            self.dirty.insert(<$ty as Record>::COLLECTION);
            Ok(record)
        }

        pub fn $insert(&mut self, record: $ty) {
            self.dirty.insert(<$ty as Record>::COLLECTION);
            self.$field.push(record);
        }
    };
}

impl UnitOfWork {
    pub(super) fn new(
        users: Vec<User>,
        teams: Vec<Team>,
        equipment: Vec<Equipment>,
        requests: Vec<MaintenanceRequest>,
    ) -> Self {
        Self {
            users,
            teams,
            equipment,
            requests,
            dirty: BTreeSet::new(),
        }
    }

    collection_access!(users, User, user, user_mut, find_user, insert_user);
    collection_access!(teams, Team, team, team_mut, find_team, insert_team);
    collection_access!(equipment, Equipment, equipment_item, equipment_mut, find_equipment, insert_equipment);
    collection_access!(requests, MaintenanceRequest, request, request_mut, find_request, insert_request);

    /// Mutable access to every team; marks teams for saving
    pub fn teams_mut(&mut self) -> impl Iterator<Item = &mut Team> {
        self.dirty.insert(Collection::Teams);
        self.teams.iter_mut()
    }

    pub fn remove_user(&mut self, id: &str) -> AppResult<User> {
        let idx = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| not_found::<User>(id))?;
        self.dirty.insert(Collection::Users);
        Ok(self.users.remove(idx))
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.teams.is_empty()
            && self.equipment.is_empty()
            && self.requests.is_empty()
    }

    pub fn is_dirty(&self, collection: Collection) -> bool {
        self.dirty.contains(&collection)
    }

    pub(super) fn into_batch(self) -> AppResult<Vec<(Collection, Documents)>> {
        let mut batch = Vec::with_capacity(self.dirty.len());
        for collection in &self.dirty {
            let documents = match collection {
                Collection::Users => encode(&self.users)?,
                Collection::Teams => encode(&self.teams)?,
                Collection::Equipment => encode(&self.equipment)?,
                Collection::Requests => encode(&self.requests)?,
            };
            batch.push((*collection, documents));
        }
        Ok(batch)
    }
}
