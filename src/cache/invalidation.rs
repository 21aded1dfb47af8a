//! Write-path cache invalidation
//!
//! Every mutating catalog operation has a hook here that deletes the cache
//! keys it made stale. The cache layer holds no relationship graph, so the
//! deck cascade resolves the parent domain with a fresh catalog read. A stale
//! entry bounded by its TTL beats a failed user-facing write, so nothing in
//! this module ever returns an error.

use std::sync::Arc;

use tracing::warn;

use crate::cache::keys;
use crate::cache::CacheStore;
use crate::catalog::Catalog;

// == Invalidator ==
/// Invalidation hooks bound to a cache store and the authoritative catalog.
#[derive(Clone)]
pub struct Invalidator {
    store: CacheStore,
    catalog: Arc<dyn Catalog>,
}

impl Invalidator {
    pub fn new(store: CacheStore, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    // == Deck Mutation ==
    /// Deletes the deck's flashcards key, then cascades to the parent
    /// domain's flashcards key.
    ///
    /// The direct key is deleted before the parent lookup, so a failed lookup
    /// still leaves the deck entry invalidated (partial invalidation).
    pub async fn deck_changed(&self, deck_id: &str) {
        self.store.del(&keys::deck_flashcards(deck_id)).await;

        match self.catalog.deck_parent(deck_id).await {
            Some(domain_id) => {
                self.store.del(&keys::domain_flashcards(&domain_id)).await;
            }
            None => {
                warn!(
                    deck_id,
                    "parent lookup failed during deck invalidation, domain key left to expire"
                );
            }
        }
    }

    // == Domain Mutation ==
    /// Deletes the global domains list and every per-user view of the domain.
    pub async fn domain_changed(&self, domain_id: &str) {
        self.store.del(&keys::domains_all()).await;
        self.store
            .del_pattern(&keys::class_views_pattern(domain_id))
            .await;
    }

    /// Deletes only the global domains list (a new domain has no per-user
    /// views to clear yet).
    pub async fn domains_list_changed(&self) {
        self.store.del(&keys::domains_all()).await;
    }

    // == Progress Mutation ==
    /// Deletes one user's cached progress for one card.
    pub async fn progress_changed(&self, user_id: &str, card_id: &str) {
        self.store
            .del(&keys::progress_card(user_id, card_id))
            .await;
    }

    /// Deletes all of one user's cached progress (bulk reset).
    pub async fn progress_reset(&self, user_id: &str) {
        self.store
            .del_pattern(&keys::user_progress_pattern(user_id))
            .await;
    }
}
