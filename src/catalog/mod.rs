//! Study content catalog
//!
//! The authoritative backing store for domains, decks, flashcards, and
//! per-user progress. The cache layer treats this as a collaborator: it is
//! queried on cache misses to populate entries, and by cascading invalidation
//! to resolve a deck's parent domain. Unlike cache failures, catalog failures
//! (entity not found) do surface to HTTP callers.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

// == Entities ==

/// A study domain. Its per-user presentation is served as a "class", which
/// is why both the `class:` and `domain:` cache namespaces carry its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A deck of flashcards inside a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub domain_id: String,
    pub name: String,
}

/// A single question/answer card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub deck_id: String,
    pub question: String,
    pub answer: String,
}

/// One user's study state for one card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardProgress {
    pub user_id: String,
    pub card_id: String,
    pub attempts: u32,
    pub correct: u32,
    pub updated_at: DateTime<Utc>,
}

/// A domain shaped for one user: content counts plus that user's progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub deck_count: usize,
    pub card_count: usize,
    pub cards_studied: usize,
}

// == Catalog Trait ==
/// Read and mutation surface of the authoritative store.
///
/// `None` means the addressed entity does not exist; callers translate that
/// into a request failure.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_domains(&self) -> Vec<Domain>;
    async fn class_view(&self, domain_id: &str, user_id: &str) -> Option<ClassView>;
    async fn domain_flashcards(&self, domain_id: &str) -> Option<Vec<Flashcard>>;
    async fn deck_flashcards(&self, deck_id: &str) -> Option<Vec<Flashcard>>;
    /// Parent domain id of a deck; used by cascading cache invalidation.
    async fn deck_parent(&self, deck_id: &str) -> Option<String>;
    async fn card_progress(&self, user_id: &str, card_id: &str) -> Option<CardProgress>;

    async fn create_domain(&self, name: String, description: String) -> Domain;
    async fn create_deck(&self, domain_id: &str, name: String) -> Option<Deck>;
    async fn rename_deck(&self, deck_id: &str, name: String) -> Option<Deck>;
    async fn add_flashcard(
        &self,
        deck_id: &str,
        question: String,
        answer: String,
    ) -> Option<Flashcard>;
    async fn record_progress(
        &self,
        user_id: &str,
        card_id: &str,
        correct: bool,
    ) -> Option<CardProgress>;
    /// Drops all of one user's progress; returns how many entries were removed.
    async fn reset_progress(&self, user_id: &str) -> u64;
}

// == In-Memory Catalog ==
/// Map-backed [`Catalog`] used by the binary and the test suite.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

#[derive(Debug, Default)]
struct CatalogState {
    domains: HashMap<String, Domain>,
    decks: HashMap<String, Deck>,
    cards: HashMap<String, Flashcard>,
    /// Keyed by (user_id, card_id)
    progress: HashMap<(String, String), CardProgress>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn list_domains(&self) -> Vec<Domain> {
        let state = self.state.read().await;
        let mut domains: Vec<Domain> = state.domains.values().cloned().collect();
        domains.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        domains
    }

    async fn class_view(&self, domain_id: &str, user_id: &str) -> Option<ClassView> {
        let state = self.state.read().await;
        let domain = state.domains.get(domain_id)?;

        let deck_ids: Vec<&String> = state
            .decks
            .values()
            .filter(|deck| deck.domain_id == domain_id)
            .map(|deck| &deck.id)
            .collect();

        let cards: Vec<&Flashcard> = state
            .cards
            .values()
            .filter(|card| deck_ids.contains(&&card.deck_id))
            .collect();

        let cards_studied = cards
            .iter()
            .filter(|card| {
                state
                    .progress
                    .contains_key(&(user_id.to_string(), card.id.clone()))
            })
            .count();

        Some(ClassView {
            id: domain.id.clone(),
            name: domain.name.clone(),
            description: domain.description.clone(),
            deck_count: deck_ids.len(),
            card_count: cards.len(),
            cards_studied,
        })
    }

    async fn domain_flashcards(&self, domain_id: &str) -> Option<Vec<Flashcard>> {
        let state = self.state.read().await;
        if !state.domains.contains_key(domain_id) {
            return None;
        }

        let deck_ids: Vec<&String> = state
            .decks
            .values()
            .filter(|deck| deck.domain_id == domain_id)
            .map(|deck| &deck.id)
            .collect();

        let mut cards: Vec<Flashcard> = state
            .cards
            .values()
            .filter(|card| deck_ids.contains(&&card.deck_id))
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        Some(cards)
    }

    async fn deck_flashcards(&self, deck_id: &str) -> Option<Vec<Flashcard>> {
        let state = self.state.read().await;
        if !state.decks.contains_key(deck_id) {
            return None;
        }

        let mut cards: Vec<Flashcard> = state
            .cards
            .values()
            .filter(|card| card.deck_id == deck_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        Some(cards)
    }

    async fn deck_parent(&self, deck_id: &str) -> Option<String> {
        let state = self.state.read().await;
        state.decks.get(deck_id).map(|deck| deck.domain_id.clone())
    }

    async fn card_progress(&self, user_id: &str, card_id: &str) -> Option<CardProgress> {
        let state = self.state.read().await;
        state
            .progress
            .get(&(user_id.to_string(), card_id.to_string()))
            .cloned()
    }

    async fn create_domain(&self, name: String, description: String) -> Domain {
        let domain = Domain {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            created_at: Utc::now(),
        };
        let mut state = self.state.write().await;
        state.domains.insert(domain.id.clone(), domain.clone());
        domain
    }

    async fn create_deck(&self, domain_id: &str, name: String) -> Option<Deck> {
        let mut state = self.state.write().await;
        if !state.domains.contains_key(domain_id) {
            return None;
        }

        let deck = Deck {
            id: Uuid::new_v4().to_string(),
            domain_id: domain_id.to_string(),
            name,
        };
        state.decks.insert(deck.id.clone(), deck.clone());
        Some(deck)
    }

    async fn rename_deck(&self, deck_id: &str, name: String) -> Option<Deck> {
        let mut state = self.state.write().await;
        let deck = state.decks.get_mut(deck_id)?;
        deck.name = name;
        Some(deck.clone())
    }

    async fn add_flashcard(
        &self,
        deck_id: &str,
        question: String,
        answer: String,
    ) -> Option<Flashcard> {
        let mut state = self.state.write().await;
        if !state.decks.contains_key(deck_id) {
            return None;
        }

        let card = Flashcard {
            id: Uuid::new_v4().to_string(),
            deck_id: deck_id.to_string(),
            question,
            answer,
        };
        state.cards.insert(card.id.clone(), card.clone());
        Some(card)
    }

    async fn record_progress(
        &self,
        user_id: &str,
        card_id: &str,
        correct: bool,
    ) -> Option<CardProgress> {
        let mut state = self.state.write().await;
        if !state.cards.contains_key(card_id) {
            return None;
        }

        let entry = state
            .progress
            .entry((user_id.to_string(), card_id.to_string()))
            .or_insert_with(|| CardProgress {
                user_id: user_id.to_string(),
                card_id: card_id.to_string(),
                attempts: 0,
                correct: 0,
                updated_at: Utc::now(),
            });
        entry.attempts += 1;
        if correct {
            entry.correct += 1;
        }
        entry.updated_at = Utc::now();
        Some(entry.clone())
    }

    async fn reset_progress(&self, user_id: &str) -> u64 {
        let mut state = self.state.write().await;
        let before = state.progress.len();
        state.progress.retain(|(uid, _), _| uid != user_id);
        (before - state.progress.len()) as u64
    }
}
