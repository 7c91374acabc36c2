use super::flashcard_store::{CardInfo, NoteInfo};

/// A card joined with its note's content, ready to be summarised.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewCard {
    pub deck_name: String,
    pub front: String,
    pub back: String,
    pub interval_days: i64,
    /// Per-mille ease as stored by the scheduler.
    pub ease_factor: u32,
    pub due: i64,
    pub reps: u32,
}

impl ReviewCard {
    /// The first field (by note-type order) is the front; every other
    /// non-empty field becomes `name: value` on the back.
    pub fn from_note(note: &NoteInfo, card: &CardInfo) -> Self {
        let fields = note.ordered_fields();
        let front = fields.first().map(|f| f.value.clone()).unwrap_or_default();
        let back = fields
            .iter()
            .skip(1)
            .filter(|f| !f.value.is_empty())
            .map(|f| format!("{}: {}", f.name, f.value))
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            deck_name: card.deck_name.clone(),
            front,
            back,
            interval_days: card.interval,
            ease_factor: card.factor,
            due: card.due,
            reps: card.reps,
        }
    }

    pub fn ease(&self) -> f64 {
        self.ease_factor as f64 / 1000.0
    }

    /// `front | back | interval d | ease x.xx | due | reps` on a single line.
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} | {} d | ease {:.2} | {} | {}",
            single_line(&self.front),
            single_line(&self.back),
            self.interval_days,
            self.ease(),
            self.due,
            self.reps
        )
    }
}

fn single_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
