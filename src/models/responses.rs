//! Response DTOs for the study cache API
//!
//! Read responses wrap the payload together with a `cached` flag telling the
//! caller whether the data was served from the cache or freshly computed.

use serde::Serialize;

use crate::catalog::{CardProgress, ClassView, Domain, Flashcard};

/// Response body for GET /domains
#[derive(Debug, Clone, Serialize)]
pub struct DomainsResponse {
    /// True when served from the cache
    pub cached: bool,
    pub domains: Vec<Domain>,
}

/// Response body for GET /classes/:id/user/:user_id
#[derive(Debug, Clone, Serialize)]
pub struct ClassViewResponse {
    pub cached: bool,
    pub class: ClassView,
}

/// Response body for the flashcard collection reads
/// (GET /decks/:id/flashcards, GET /domains/:id/flashcards)
#[derive(Debug, Clone, Serialize)]
pub struct FlashcardsResponse {
    pub cached: bool,
    pub flashcards: Vec<Flashcard>,
}

/// Response body for GET /progress/:user_id/card/:card_id
#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub cached: bool,
    pub progress: CardProgress,
}

/// Response body for the entity-creating write operations
#[derive(Debug, Clone, Serialize)]
pub struct DomainCreatedResponse {
    pub message: String,
    pub domain: Domain,
}

impl DomainCreatedResponse {
    pub fn new(domain: Domain) -> Self {
        Self {
            message: format!("Domain '{}' created", domain.name),
            domain,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeckResponse {
    pub message: String,
    pub deck: crate::catalog::Deck,
}

impl DeckResponse {
    pub fn new(message: impl Into<String>, deck: crate::catalog::Deck) -> Self {
        Self {
            message: message.into(),
            deck,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlashcardCreatedResponse {
    pub message: String,
    pub flashcard: Flashcard,
}

impl FlashcardCreatedResponse {
    pub fn new(flashcard: Flashcard) -> Self {
        Self {
            message: "Flashcard created".to_string(),
            flashcard,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdatedResponse {
    pub message: String,
    pub progress: CardProgress,
}

impl ProgressUpdatedResponse {
    pub fn new(progress: CardProgress) -> Self {
        Self {
            message: "Progress recorded".to_string(),
            progress,
        }
    }
}

/// Response body for DELETE /progress/:user_id
#[derive(Debug, Clone, Serialize)]
pub struct ProgressResetResponse {
    pub message: String,
    /// Number of progress entries removed from the catalog
    pub removed: u64,
}

impl ProgressResetResponse {
    pub fn new(user_id: &str, removed: u64) -> Self {
        Self {
            message: format!("Progress reset for user '{}'", user_id),
            removed,
        }
    }
}

/// Response body for POST /metrics/reset
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResetResponse {
    pub message: String,
}

impl MetricsResetResponse {
    pub fn new() -> Self {
        Self {
            message: "Cache metrics reset".to_string(),
        }
    }
}

impl Default for MetricsResetResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" when the cache backend answered the ping, "degraded" when it
    /// did not (requests still work, they just skip the cache)
    pub status: String,
    pub cache_reachable: bool,
    pub cache_latency_ms: u64,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(reachable: bool, latency_ms: u64) -> Self {
        Self {
            status: if reachable { "healthy" } else { "degraded" }.to_string(),
            cache_reachable: reachable,
            cache_latency_ms: latency_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
