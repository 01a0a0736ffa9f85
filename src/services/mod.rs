//! Business logic services

pub mod admin;
pub mod catalog;
pub mod redis;

use std::sync::Arc;

use crate::{repository::Store, session::SessionStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub admin: admin::AdminService,
    pub sessions: Arc<dyn SessionStore>,
    /// Entity store, for readiness checks
    pub store: Store,
}

impl Services {
    /// Create all services over the given entity and session stores
    pub fn new(store: Store, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            admin: admin::AdminService::new(store.clone()),
            sessions,
            store,
        }
    }
}
