//! Rows read from the source store.
//!
//! These are read-only snapshots; nothing in the export mutates them.

/// A dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// Source identity.
    pub id: i64,
    /// Display form.
    pub word: String,
    /// Canonical form the lookup key is derived from.
    pub word_normalized: Option<String>,
    /// Grammatical gender.
    pub gender: Option<String>,
    /// Part of speech, exported as `grammar`.
    pub part_of_speech: Option<String>,
    /// Stress marking.
    pub stress: Option<String>,
    /// Whether the entry is a multi-word phrase.
    pub is_phrase: bool,
    /// Last modification timestamp as stored in the source.
    pub updated_at: Option<String>,
}

impl Entry {
    /// Create an entry with the given identity and display form.
    pub fn new(id: i64, word: impl Into<String>) -> Self {
        Self {
            id,
            word: word.into(),
            ..Default::default()
        }
    }

    /// Set the canonical form.
    pub fn with_normalized(mut self, word_normalized: impl Into<String>) -> Self {
        self.word_normalized = Some(word_normalized.into());
        self
    }

    /// Set the gender.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Set the part of speech.
    pub fn with_part_of_speech(mut self, part_of_speech: impl Into<String>) -> Self {
        self.part_of_speech = Some(part_of_speech.into());
        self
    }

    /// Set the stress marking.
    pub fn with_stress(mut self, stress: impl Into<String>) -> Self {
        self.stress = Some(stress.into());
        self
    }

    /// Mark the entry as a phrase.
    pub fn with_is_phrase(mut self, is_phrase: bool) -> Self {
        self.is_phrase = is_phrase;
        self
    }

    /// Set the modification timestamp.
    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }
}

/// A translation belonging to one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub entry_id: i64,
    pub display_word: String,
    pub confidence_score: i64,
}

impl Translation {
    pub fn new(entry_id: i64, display_word: impl Into<String>, confidence_score: i64) -> Self {
        Self {
            entry_id,
            display_word: display_word.into(),
            confidence_score,
        }
    }
}

/// A (base form, inflected form) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflectedForm {
    pub base_form: Option<String>,
    pub inflected_form: String,
}

impl InflectedForm {
    pub fn new(base_form: impl Into<String>, inflected_form: impl Into<String>) -> Self {
        Self {
            base_form: Some(base_form.into()),
            inflected_form: inflected_form.into(),
        }
    }
}
