//! API Handlers
//!
//! HTTP request handlers. Reads follow the read-through pattern: try the
//! cache, fall back to the catalog on a miss, then repopulate the cache with
//! a detached task so the response never waits on the write. Writes mutate
//! the catalog first and then run the matching invalidation hook.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::cache::{CacheCategory, CacheStore, Invalidator, MemoryBackend};
use crate::catalog::{Catalog, CardProgress, ClassView, Domain, Flashcard, InMemoryCatalog};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    ClassViewResponse, CreateDeckRequest, CreateDomainRequest, CreateFlashcardRequest,
    DeckResponse, DomainCreatedResponse, DomainsResponse, FlashcardCreatedResponse,
    FlashcardsResponse, HealthResponse, MetricsResetResponse, ProgressResetResponse,
    ProgressResponse, ProgressUpdatedResponse, RecordProgressRequest, RenameDeckRequest,
};
use crate::{cache::keys, metrics::MetricsSnapshot};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through cache over the backing key-value store
    pub store: CacheStore,
    /// Authoritative content store
    pub catalog: Arc<dyn Catalog>,
    /// Write-path invalidation hooks
    pub invalidator: Invalidator,
}

impl AppState {
    /// Creates a new AppState over the given store and catalog.
    pub fn new(store: CacheStore, catalog: Arc<dyn Catalog>) -> Self {
        let invalidator = Invalidator::new(store.clone(), catalog.clone());
        Self {
            store,
            catalog,
            invalidator,
        }
    }

    /// Creates an AppState with in-process backing stores from configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = CacheStore::new(
            Arc::new(MemoryBackend::new(config.max_entries)),
            Duration::from_millis(config.cache_op_timeout_ms),
        );
        Self::new(store, Arc::new(InMemoryCatalog::new()))
    }

    /// Detached cache population: the caller's response does not wait on the
    /// write, and a failed write only shows up in the logs and counters.
    fn populate<T: serde::Serialize + Send + Sync + 'static>(
        &self,
        key: String,
        value: T,
        category: CacheCategory,
    ) {
        let store = self.store.clone();
        tokio::spawn(async move {
            store.set(&key, &value, category.ttl_secs()).await;
        });
    }
}

// == Read Path ==

/// Handler for GET /domains
pub async fn list_domains_handler(State(state): State<AppState>) -> Json<DomainsResponse> {
    let key = keys::domains_all();
    if let Some(domains) = state.store.get::<Vec<Domain>>(&key).await {
        return Json(DomainsResponse {
            cached: true,
            domains,
        });
    }

    let domains = state.catalog.list_domains().await;
    state.populate(key, domains.clone(), CacheCategory::DomainsList);
    Json(DomainsResponse {
        cached: false,
        domains,
    })
}

/// Handler for GET /classes/:id/user/:user_id
pub async fn class_view_handler(
    State(state): State<AppState>,
    Path((class_id, user_id)): Path<(String, String)>,
) -> Result<Json<ClassViewResponse>> {
    let key = keys::class_view(&class_id, &user_id);
    if let Some(class) = state.store.get::<ClassView>(&key).await {
        return Ok(Json(ClassViewResponse {
            cached: true,
            class,
        }));
    }

    let class = state
        .catalog
        .class_view(&class_id, &user_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Class '{}' not found", class_id)))?;
    state.populate(key, class.clone(), CacheCategory::ClassView);
    Ok(Json(ClassViewResponse {
        cached: false,
        class,
    }))
}

/// Handler for GET /domains/:id/flashcards
pub async fn domain_flashcards_handler(
    State(state): State<AppState>,
    Path(domain_id): Path<String>,
) -> Result<Json<FlashcardsResponse>> {
    let key = keys::domain_flashcards(&domain_id);
    if let Some(flashcards) = state.store.get::<Vec<Flashcard>>(&key).await {
        return Ok(Json(FlashcardsResponse {
            cached: true,
            flashcards,
        }));
    }

    let flashcards = state
        .catalog
        .domain_flashcards(&domain_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Domain '{}' not found", domain_id)))?;
    state.populate(key, flashcards.clone(), CacheCategory::DomainFlashcards);
    Ok(Json(FlashcardsResponse {
        cached: false,
        flashcards,
    }))
}

/// Handler for GET /decks/:id/flashcards
pub async fn deck_flashcards_handler(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
) -> Result<Json<FlashcardsResponse>> {
    let key = keys::deck_flashcards(&deck_id);
    if let Some(flashcards) = state.store.get::<Vec<Flashcard>>(&key).await {
        return Ok(Json(FlashcardsResponse {
            cached: true,
            flashcards,
        }));
    }

    let flashcards = state
        .catalog
        .deck_flashcards(&deck_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Deck '{}' not found", deck_id)))?;
    state.populate(key, flashcards.clone(), CacheCategory::DeckFlashcards);
    Ok(Json(FlashcardsResponse {
        cached: false,
        flashcards,
    }))
}

/// Handler for GET /progress/:user_id/card/:card_id
pub async fn get_progress_handler(
    State(state): State<AppState>,
    Path((user_id, card_id)): Path<(String, String)>,
) -> Result<Json<ProgressResponse>> {
    let key = keys::progress_card(&user_id, &card_id);
    if let Some(progress) = state.store.get::<CardProgress>(&key).await {
        return Ok(Json(ProgressResponse {
            cached: true,
            progress,
        }));
    }

    let progress = state
        .catalog
        .card_progress(&user_id, &card_id)
        .await
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No progress for user '{}' on card '{}'",
                user_id, card_id
            ))
        })?;
    state.populate(key, progress.clone(), CacheCategory::Progress);
    Ok(Json(ProgressResponse {
        cached: false,
        progress,
    }))
}

// == Write Path ==

/// Handler for POST /domains
pub async fn create_domain_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateDomainRequest>,
) -> Result<Json<DomainCreatedResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let domain = state.catalog.create_domain(req.name, req.description).await;
    state.invalidator.domains_list_changed().await;
    Ok(Json(DomainCreatedResponse::new(domain)))
}

/// Handler for POST /domains/:id/decks
pub async fn create_deck_handler(
    State(state): State<AppState>,
    Path(domain_id): Path<String>,
    Json(req): Json<CreateDeckRequest>,
) -> Result<Json<DeckResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let deck = state
        .catalog
        .create_deck(&domain_id, req.name)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Domain '{}' not found", domain_id)))?;
    state.invalidator.deck_changed(&deck.id).await;
    state.invalidator.domain_changed(&domain_id).await;
    Ok(Json(DeckResponse::new(
        format!("Deck '{}' created", deck.name),
        deck,
    )))
}

/// Handler for PUT /decks/:id
pub async fn rename_deck_handler(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
    Json(req): Json<RenameDeckRequest>,
) -> Result<Json<DeckResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let deck = state
        .catalog
        .rename_deck(&deck_id, req.name)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Deck '{}' not found", deck_id)))?;
    state.invalidator.deck_changed(&deck_id).await;
    Ok(Json(DeckResponse::new(
        format!("Deck '{}' updated", deck.name),
        deck,
    )))
}

/// Handler for POST /decks/:id/flashcards
pub async fn create_flashcard_handler(
    State(state): State<AppState>,
    Path(deck_id): Path<String>,
    Json(req): Json<CreateFlashcardRequest>,
) -> Result<Json<FlashcardCreatedResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let flashcard = state
        .catalog
        .add_flashcard(&deck_id, req.question, req.answer)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Deck '{}' not found", deck_id)))?;
    state.invalidator.deck_changed(&deck_id).await;
    Ok(Json(FlashcardCreatedResponse::new(flashcard)))
}

/// Handler for PUT /progress/:user_id/card/:card_id
pub async fn record_progress_handler(
    State(state): State<AppState>,
    Path((user_id, card_id)): Path<(String, String)>,
    Json(req): Json<RecordProgressRequest>,
) -> Result<Json<ProgressUpdatedResponse>> {
    let progress = state
        .catalog
        .record_progress(&user_id, &card_id, req.correct)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Card '{}' not found", card_id)))?;
    state.invalidator.progress_changed(&user_id, &card_id).await;
    Ok(Json(ProgressUpdatedResponse::new(progress)))
}

/// Handler for DELETE /progress/:user_id
pub async fn reset_progress_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<ProgressResetResponse> {
    let removed = state.catalog.reset_progress(&user_id).await;
    state.invalidator.progress_reset(&user_id).await;
    Json(ProgressResetResponse::new(&user_id, removed))
}

// == Operational ==

/// Handler for GET /metrics (text exposition format)
pub async fn metrics_text_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.store.metrics_text(),
    )
}

/// Handler for GET /metrics/json
pub async fn metrics_json_handler(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.store.metrics())
}

/// Handler for POST /metrics/reset
pub async fn metrics_reset_handler(State(state): State<AppState>) -> Json<MetricsResetResponse> {
    state.store.reset_metrics();
    Json(MetricsResetResponse::new())
}

/// Handler for GET /health
///
/// Pings the cache backend and reports reachability with observed latency.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.store.check_health().await;
    Json(HealthResponse::new(health.reachable, health.latency_ms))
}
