use std::collections::HashMap;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::review::domain::flashcard_store::{CardInfo, FlashcardStore, NoteField, NoteInfo};
use crate::shared::config::FlashcardStoreConfig;
use crate::shared::constants::ANKI_CONNECT_VERSION;
use crate::shared::error::ServiceError;

const SERVICE: &str = "AnkiConnect";

/// Flashcard store backed by the AnkiConnect add-on's JSON-over-HTTP API.
pub struct AnkiConnectStore {
    client: Client,
    url: String,
}

#[derive(Serialize)]
struct ActionRequest<'a> {
    action: &'a str,
    version: u32,
    #[serde(skip_serializing_if = "Value::is_null")]
    params: Value,
}

#[derive(Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct WireNote {
    note_id: u64,
    fields: HashMap<String, WireField>,
    cards: Vec<u64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireField {
    value: String,
    order: u32,
}

/// AnkiConnect answers `{}` for a card id it does not know, so every field
/// is optional on the wire.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct WireCard {
    card_id: Option<u64>,
    deck_name: String,
    interval: i64,
    factor: u32,
    due: i64,
    reps: u32,
}

impl From<WireNote> for NoteInfo {
    fn from(note: WireNote) -> Self {
        let mut fields: Vec<NoteField> = note
            .fields
            .into_iter()
            .map(|(name, f)| NoteField {
                name,
                value: f.value,
                order: f.order,
            })
            .collect();
        fields.sort_by_key(|f| f.order);
        NoteInfo {
            note_id: note.note_id,
            fields,
            cards: note.cards,
        }
    }
}

impl WireCard {
    /// `None` for the empty entry of an unknown card.
    fn into_card(self) -> Option<CardInfo> {
        Some(CardInfo {
            card_id: self.card_id?,
            deck_name: self.deck_name,
            interval: self.interval,
            factor: self.factor,
            due: self.due,
            reps: self.reps,
        })
    }
}

impl AnkiConnectStore {
    pub fn new(config: &FlashcardStoreConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    fn invoke<T: DeserializeOwned>(&self, action: &str, params: Value) -> Result<T, ServiceError> {
        let request = ActionRequest {
            action,
            version: ANKI_CONNECT_VERSION,
            params,
        };
        log::debug!("AnkiConnect {action}");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                service: SERVICE.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response
            .text()
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;
        decode_envelope(action, &body)
    }
}

fn known_cards(cards: Vec<WireCard>) -> Vec<CardInfo> {
    let received = cards.len();
    let known: Vec<CardInfo> = cards.into_iter().filter_map(WireCard::into_card).collect();
    if known.len() < received {
        log::warn!("Skipped {} unknown cards in cardsInfo", received - known.len());
    }
    known
}

/// Unwraps `{result, error}`. A non-null `error` wins over any result.
fn decode_envelope<T: DeserializeOwned>(action: &str, body: &str) -> Result<T, ServiceError> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| ServiceError::MalformedResponse {
            service: SERVICE.to_string(),
            reason: format!("{action}: {e}"),
        })?;
    if let Some(message) = envelope.error {
        return Err(ServiceError::Api {
            service: SERVICE.to_string(),
            message: format!("{action}: {message}"),
        });
    }
    envelope
        .result
        .ok_or_else(|| ServiceError::MalformedResponse {
            service: SERVICE.to_string(),
            reason: format!("{action}: null result"),
        })
}

impl FlashcardStore for AnkiConnectStore {
    fn find_notes(&self, query: &str) -> Result<Vec<u64>, ServiceError> {
        self.invoke("findNotes", json!({ "query": query }))
    }

    fn notes_info(&self, note_ids: &[u64]) -> Result<Vec<NoteInfo>, ServiceError> {
        let notes: Vec<WireNote> = self.invoke("notesInfo", json!({ "notes": note_ids }))?;
        Ok(notes.into_iter().map(NoteInfo::from).collect())
    }

    fn cards_info(&self, card_ids: &[u64]) -> Result<Vec<CardInfo>, ServiceError> {
        let cards: Vec<WireCard> = self.invoke("cardsInfo", json!({ "cards": card_ids }))?;
        Ok(known_cards(cards))
    }

    fn deck_names(&self) -> Result<Vec<String>, ServiceError> {
        self.invoke("deckNames", Value::Null)
    }
}
