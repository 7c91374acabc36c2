use crate::shared::error::ServiceError;

/// One field of a note as reported by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteField {
    pub name: String,
    pub value: String,
    /// Position of the field in the note type.
    pub order: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteInfo {
    pub note_id: u64,
    pub fields: Vec<NoteField>,
    pub cards: Vec<u64>,
}

impl NoteInfo {
    /// Fields sorted by their position in the note type.
    pub fn ordered_fields(&self) -> Vec<&NoteField> {
        let mut fields: Vec<&NoteField> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.order);
        fields
    }
}

/// Scheduling state of one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardInfo {
    pub card_id: u64,
    pub deck_name: String,
    /// Days; negative values are learning steps in seconds.
    pub interval: i64,
    /// Ease in per-mille (2500 = 2.50).
    pub factor: u32,
    pub due: i64,
    pub reps: u32,
}

/// Read access to a spaced-repetition collection.
pub trait FlashcardStore: Send {
    /// Note ids matching a search query.
    fn find_notes(&self, query: &str) -> Result<Vec<u64>, ServiceError>;

    fn notes_info(&self, note_ids: &[u64]) -> Result<Vec<NoteInfo>, ServiceError>;

    fn cards_info(&self, card_ids: &[u64]) -> Result<Vec<CardInfo>, ServiceError>;

    fn deck_names(&self) -> Result<Vec<String>, ServiceError>;
}

/// Search query selecting every note in a deck (and its subdecks).
pub fn deck_query(deck_name: &str) -> String {
    format!("deck:\"{deck_name}\"")
}
