//! Request DTOs for the study cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for creating a study domain (POST /domains)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDomainRequest {
    /// Display name of the domain
    pub name: String,
    /// Longer description shown on the class page
    #[serde(default)]
    pub description: String,
}

impl CreateDomainRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Domain name cannot be empty".to_string());
        }
        None
    }
}

/// Request body for creating a deck (POST /domains/:id/decks)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeckRequest {
    /// Display name of the deck
    pub name: String,
}

impl CreateDeckRequest {
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Deck name cannot be empty".to_string());
        }
        None
    }
}

/// Request body for renaming a deck (PUT /decks/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct RenameDeckRequest {
    /// New display name
    pub name: String,
}

impl RenameDeckRequest {
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Deck name cannot be empty".to_string());
        }
        None
    }
}

/// Request body for adding a flashcard (POST /decks/:id/flashcards)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFlashcardRequest {
    pub question: String,
    pub answer: String,
}

impl CreateFlashcardRequest {
    pub fn validate(&self) -> Option<String> {
        if self.question.trim().is_empty() {
            return Some("Question cannot be empty".to_string());
        }
        if self.answer.trim().is_empty() {
            return Some("Answer cannot be empty".to_string());
        }
        None
    }
}

/// Request body for recording a study attempt
/// (PUT /progress/:user_id/card/:card_id)
#[derive(Debug, Clone, Deserialize)]
pub struct RecordProgressRequest {
    /// Whether the user answered the card correctly
    pub correct: bool,
}
