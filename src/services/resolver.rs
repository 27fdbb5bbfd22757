//! Link resolution collaborator
//!
//! Tracking codes belong to the surrounding application's link storage;
//! this service only confirms that a code maps to an active sponsored
//! link and reads its destination. Strictly read-only.

use async_trait::async_trait;
use dashmap::DashMap;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::errors::Result;
use crate::ledger::SponsoredLink;

use migration::entities::sponsored_link;

#[async_trait]
pub trait LinkResolver: Send + Sync {
    /// Look up a tracking code. `None` when the code is unknown; callers
    /// decide how to treat inactive links.
    async fn resolve(&self, link_id: &str) -> Result<Option<SponsoredLink>>;
}

pub struct SeaOrmResolver {
    db: DatabaseConnection,
}

impl SeaOrmResolver {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LinkResolver for SeaOrmResolver {
    async fn resolve(&self, link_id: &str) -> Result<Option<SponsoredLink>> {
        let model = sponsored_link::Entity::find_by_id(link_id)
            .one(&self.db)
            .await?;

        Ok(model.map(|m| SponsoredLink {
            id: m.id,
            target_url: m.target_url,
            title: m.title,
            is_active: m.is_active,
        }))
    }
}

/// In-memory resolver for tests and local development.
#[derive(Default)]
pub struct MemoryResolver {
    links: DashMap<String, SponsoredLink>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
        }
    }

    pub fn insert(&self, link: SponsoredLink) {
        self.links.insert(link.id.clone(), link);
    }
}

#[async_trait]
impl LinkResolver for MemoryResolver {
    async fn resolve(&self, link_id: &str) -> Result<Option<SponsoredLink>> {
        Ok(self.links.get(link_id).map(|entry| entry.value().clone()))
    }
}
