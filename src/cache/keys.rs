//! Cache key construction and TTL policy
//!
//! The only permitted source of cache key strings in the crate. Read paths and
//! invalidation paths call the same builder for a given entity, so the key
//! shape can never drift between the two. Identifiers are embedded verbatim:
//! the upstream identity provider and id generator constrain them to a safe
//! character set before they reach this layer.
//!
//! Pattern builders (`*` wildcard) are used only for bulk deletion, never for
//! direct get/set.

// == Key Builders ==

/// Key for the global domains list.
pub fn domains_all() -> String {
    "domains:all".to_string()
}

/// Key for one user's view of a class (a study domain with per-user stats).
pub fn class_view(class_id: &str, user_id: &str) -> String {
    format!("class:{}:user:{}", class_id, user_id)
}

/// Key for every flashcard across a domain's decks.
pub fn domain_flashcards(domain_id: &str) -> String {
    format!("domain:{}:flashcards", domain_id)
}

/// Key for a single deck's flashcards.
pub fn deck_flashcards(deck_id: &str) -> String {
    format!("deck:{}:flashcards", deck_id)
}

/// Key for one user's progress on one card.
pub fn progress_card(user_id: &str, card_id: &str) -> String {
    format!("progress:{}:card:{}", user_id, card_id)
}

// == Pattern Builders ==

/// Pattern matching every per-user view of a class.
pub fn class_views_pattern(class_id: &str) -> String {
    format!("class:{}:user:*", class_id)
}

/// Pattern matching all of one user's progress entries.
pub fn user_progress_pattern(user_id: &str) -> String {
    format!("progress:{}:*", user_id)
}

// == TTL Policy ==

/// Cacheable entity categories and their time-to-live.
///
/// Exactly one TTL per category. Volatile per-user data expires in seconds to
/// low minutes; stable reference collections live longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheCategory {
    /// The global domains list
    DomainsList,
    /// Per-user class view
    ClassView,
    /// All flashcards of a domain
    DomainFlashcards,
    /// A single deck's flashcards
    DeckFlashcards,
    /// Per-user, per-card progress
    Progress,
}

impl CacheCategory {
    /// TTL in seconds for entries of this category.
    pub fn ttl_secs(self) -> u64 {
        match self {
            CacheCategory::DomainsList => 300,
            CacheCategory::ClassView => 120,
            CacheCategory::DomainFlashcards => 600,
            CacheCategory::DeckFlashcards => 600,
            CacheCategory::Progress => 60,
        }
    }
}
