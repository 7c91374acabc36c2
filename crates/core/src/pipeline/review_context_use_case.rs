use std::fs;
use std::path::{Path, PathBuf};

use crate::review::domain::context_document::{context_file_name, render_context};
use crate::review::domain::flashcard_store::{deck_query, FlashcardStore};
use crate::review::domain::review_card::ReviewCard;
use crate::shared::error::SongError;
use crate::shared::retry::{retry_service_call, RetryPolicy};

/// Exports the review state of a deck as a plain-text context document.
pub struct ReviewContextUseCase {
    store: Box<dyn FlashcardStore>,
    retry: RetryPolicy,
}

impl ReviewContextUseCase {
    pub fn new(store: Box<dyn FlashcardStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Every card of the deck joined with its note, in store order.
    pub fn collect_cards(&self, deck_name: &str) -> Result<Vec<ReviewCard>, SongError> {
        let query = deck_query(deck_name);
        let note_ids = retry_service_call(&self.retry, "findNotes", || {
            self.store.find_notes(&query)
        })?;
        if note_ids.is_empty() {
            return Ok(Vec::new());
        }

        let notes = retry_service_call(&self.retry, "notesInfo", || {
            self.store.notes_info(&note_ids)
        })?;

        let mut cards = Vec::new();
        for note in &notes {
            if note.cards.is_empty() {
                continue;
            }
            let infos = retry_service_call(&self.retry, "cardsInfo", || {
                self.store.cards_info(&note.cards)
            })?;
            cards.extend(infos.iter().map(|card| ReviewCard::from_note(note, card)));
        }
        Ok(cards)
    }

    /// Writes `<output_dir>/<deck>.txt`. Returns `None` without touching the
    /// filesystem when the deck has no cards.
    pub fn execute(
        &self,
        deck_name: &str,
        output_dir: &Path,
    ) -> Result<Option<PathBuf>, SongError> {
        let cards = self.collect_cards(deck_name)?;
        if cards.is_empty() {
            log::warn!("No cards found in deck: {deck_name}");
            return Ok(None);
        }

        fs::create_dir_all(output_dir).map_err(|e| SongError::io(output_dir, e))?;
        let path = output_dir.join(context_file_name(deck_name));
        fs::write(&path, render_context(deck_name, &cards))
            .map_err(|e| SongError::io(&path, e))?;

        log::info!(
            "Wrote {} cards for deck '{deck_name}' to {}",
            cards.len(),
            path.display()
        );
        Ok(Some(path))
    }

    pub fn deck_names(&self) -> Result<Vec<String>, SongError> {
        let names = retry_service_call(&self.retry, "deckNames", || self.store.deck_names())?;
        Ok(names)
    }
}
