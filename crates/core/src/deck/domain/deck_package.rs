use std::path::PathBuf;

use super::flashcard::FlashcardRecord;
use crate::shared::constants::{DECK_ID, DECK_NAME_PREFIX, NOTE_MODEL_ID, NOTE_MODEL_NAME};

pub const CARD_STYLE: &str = "text-align: center; font-size: 20px;";

/// Note type shared by every song deck.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteModel {
    pub id: i64,
    pub name: &'static str,
    pub fields: [&'static str; 3],
    pub template_name: &'static str,
    pub front_template: String,
    pub back_template: String,
}

impl NoteModel {
    pub fn song_lyrics() -> Self {
        Self {
            id: NOTE_MODEL_ID,
            name: NOTE_MODEL_NAME,
            fields: ["Audio", "Text", "Translation"],
            template_name: "Card 1",
            front_template: format!(r#"<div style="{CARD_STYLE}">{{{{Audio}}}}<br>{{{{Text}}}}</div>"#),
            back_template: format!(
                r#"<div style="{CARD_STYLE}">{{{{FrontSide}}}}<hr id="answer">{{{{Translation}}}}</div>"#
            ),
        }
    }
}

/// Everything needed to write one song's deck: cards plus the clip files
/// they reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckPackage {
    pub song_id: String,
    pub deck_id: i64,
    pub deck_name: String,
    pub model: NoteModel,
    pub records: Vec<FlashcardRecord>,
    /// Media files, in record order.
    pub media: Vec<PathBuf>,
}

impl DeckPackage {
    pub fn new(song_id: &str, records: Vec<FlashcardRecord>, media: Vec<PathBuf>) -> Self {
        Self {
            song_id: song_id.to_string(),
            deck_id: DECK_ID,
            deck_name: format!("{DECK_NAME_PREFIX}{song_id}"),
            model: NoteModel::song_lyrics(),
            records,
            media,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_name_nests_under_song_lyrics() {
        let package = DeckPackage::new("Again - Yui", Vec::new(), Vec::new());
        assert_eq!(package.deck_name, "Song Lyrics::Again - Yui");
        assert_eq!(package.deck_id, DECK_ID);
    }

    #[test]
    fn test_templates_reference_model_fields() {
        let model = NoteModel::song_lyrics();
        assert!(model.front_template.contains("{{Audio}}"));
        assert!(model.front_template.contains("{{Text}}"));
        assert!(model.back_template.contains("{{FrontSide}}"));
        assert!(model.back_template.contains("{{Translation}}"));
    }
}
