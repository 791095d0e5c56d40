//! Enrichment of user references
//!
//! News, likes and comments are read with bare user ids. `enrich` collects
//! every distinct id across a batch, resolves them with a single directory
//! call, and splices the profiles back in. Ids the directory doesn't know
//! stay as bare references.

use crate::error::{NewsError, Result};
use crate::metrics;
use crate::models::{Comment, Like, News};
use crate::services::UserDirectory;
use portal_common::Profile;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Items carrying user references
pub trait UserRefs {
    fn user_ids(&self) -> Vec<Uuid>;

    fn resolve(&mut self, profiles: &HashMap<Uuid, Profile>);
}

fn resolve_slot(slot: &mut Profile, profiles: &HashMap<Uuid, Profile>) {
    if let Some(profile) = profiles.get(&slot.id) {
        *slot = profile.clone();
    }
}

impl UserRefs for News {
    fn user_ids(&self) -> Vec<Uuid> {
        vec![self.author.id, self.user_created.id, self.user_updated.id]
    }

    fn resolve(&mut self, profiles: &HashMap<Uuid, Profile>) {
        resolve_slot(&mut self.author, profiles);
        resolve_slot(&mut self.user_created, profiles);
        resolve_slot(&mut self.user_updated, profiles);
    }
}

impl UserRefs for Like {
    fn user_ids(&self) -> Vec<Uuid> {
        vec![self.liker.id]
    }

    fn resolve(&mut self, profiles: &HashMap<Uuid, Profile>) {
        resolve_slot(&mut self.liker, profiles);
    }
}

impl UserRefs for Comment {
    fn user_ids(&self) -> Vec<Uuid> {
        vec![self.author.id]
    }

    fn resolve(&mut self, profiles: &HashMap<Uuid, Profile>) {
        resolve_slot(&mut self.author, profiles);
    }
}

/// Distinct ids in first-seen order
pub fn distinct_user_ids<T: UserRefs>(items: &[T]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    items
        .iter()
        .flat_map(|item| item.user_ids())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Resolve every user reference in `items` with at most one lookup.
pub async fn enrich<T: UserRefs>(items: &mut [T], directory: &dyn UserDirectory) -> Result<()> {
    let ids = distinct_user_ids(items);
    if ids.is_empty() {
        return Ok(());
    }

    let profiles = match directory.profiles_by_ids(&ids).await {
        Ok(profiles) => {
            metrics::record_user_lookup("success");
            profiles
        }
        Err(e) => {
            metrics::record_user_lookup("error");
            tracing::error!(error = %e, users = ids.len(), "User lookup failed");
            return Err(NewsError::UserService(e.to_string()));
        }
    };

    if profiles.len() < ids.len() {
        tracing::debug!(
            requested = ids.len(),
            resolved = profiles.len(),
            "Some users were not found in the directory"
        );
    }

    let by_id: HashMap<Uuid, Profile> = profiles.into_iter().map(|p| (p.id, p)).collect();
    for item in items.iter_mut() {
        item.resolve(&by_id);
    }

    Ok(())
}
