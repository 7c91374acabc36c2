use super::review_card::ReviewCard;

pub const CONTEXT_EXTENSION: &str = "txt";

/// File name for a deck's context document. Subdeck separators become `_`.
pub fn context_file_name(deck_name: &str) -> String {
    format!("{}.{CONTEXT_EXTENSION}", deck_name.replace("::", "_"))
}

/// Renders the review state of a deck as plain text, one card per line.
pub fn render_context(deck_name: &str, cards: &[ReviewCard]) -> String {
    let mut text = String::new();
    text.push_str("Available Decks and Cards:\n\n");
    text.push_str(&format!("Deck: {deck_name}\n"));
    text.push_str("Format: Front | Back | Interval | Ease | Due | Reps\n\n");
    for card in cards {
        text.push_str(&card.summary_line());
        text.push('\n');
    }
    text
}
