//! Mock user directory for integration tests
//!
//! Answers lookups from an in-memory map and records every call, so tests
//! can check that a read makes exactly one batched lookup.

use anyhow::anyhow;
use async_trait::async_trait;
use news_service::UserDirectory;
use portal_common::Profile;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MockUserDirectory {
    users: Arc<Mutex<HashMap<Uuid, Profile>>>,
    calls: Arc<Mutex<Vec<Vec<Uuid>>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockUserDirectory {
    pub fn new(profiles: Vec<Profile>) -> Self {
        let dir = Self::default();
        for profile in profiles {
            dir.add(profile);
        }
        dir
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add(&self, profile: Profile) {
        self.users.lock().unwrap().insert(profile.id, profile);
    }

    /// Make every following lookup fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Ids sent with each call, in call order
    pub fn calls(&self) -> Vec<Vec<Uuid>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn profiles_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Profile>> {
        self.calls.lock().unwrap().push(ids.to_vec());

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow!("user-service unavailable"));
        }

        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

/// Profile as the directory would return it
pub fn profile(username: &str, roles: &[&str]) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        username: username.to_string(),
        first_name: format!("{}-first", username),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        ..Default::default()
    }
}
