use super::alignment_validator::{split_response, validate};
use super::language_model::LanguageModel;
use super::translation_prompt::build_translation_prompt;
use crate::lyrics::domain::lyric_line::LyricLine;
use crate::shared::error::SongError;
use crate::shared::retry::{retry_service_call, RetryPolicy};

/// Translates a song's lyrics in one batched language-model call and
/// returns one translation per lyric line, in line order.
pub struct LyricTranslator {
    model: Box<dyn LanguageModel>,
    retry: RetryPolicy,
}

impl LyricTranslator {
    pub fn new(model: Box<dyn LanguageModel>, retry: RetryPolicy) -> Self {
        Self { model, retry }
    }

    pub fn translate(&self, lines: &[LyricLine]) -> Result<Vec<String>, SongError> {
        let prompt = build_translation_prompt(lines);
        let label = format!("{} translation", self.model.name());
        let response = retry_service_call(&self.retry, &label, || self.model.complete(&prompt))?;

        let translated = split_response(&response)?;
        let source = LyricLine::texts(lines);
        let aligned = validate(&source, &translated)?;
        log::debug!("Received {} aligned translations", aligned.len());
        Ok(aligned)
    }
}
