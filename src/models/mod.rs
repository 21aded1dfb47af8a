//! Request and Response models for the study cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CreateDeckRequest, CreateDomainRequest, CreateFlashcardRequest, RecordProgressRequest,
    RenameDeckRequest,
};
pub use responses::{
    ClassViewResponse, DeckResponse, DomainCreatedResponse, DomainsResponse, ErrorResponse,
    FlashcardCreatedResponse, FlashcardsResponse, HealthResponse, MetricsResetResponse,
    ProgressResetResponse, ProgressResponse, ProgressUpdatedResponse,
};
