pub mod shared {
    pub mod config;
    pub mod constants;
    pub mod error;
    pub mod line_metadata;
    pub mod retry;
    pub mod song_paths;
}

pub mod lyrics {
    pub mod domain {
        pub mod lyric_document;
        pub mod lyric_line;
        pub mod timestamp;
    }
    pub mod infrastructure;
}

pub mod audio {
    pub mod domain {
        pub mod audio_clip;
        pub mod audio_reader;
        pub mod audio_segmenter;
        pub mod audio_track;
        pub mod clip_encoder;
    }
    pub mod infrastructure;
}

pub mod translation {
    pub mod domain {
        pub mod alignment_validator;
        pub mod language_model;
        pub mod lyric_translator;
        pub mod translation_prompt;
    }
    pub mod infrastructure;
}

pub mod deck {
    pub mod domain {
        pub mod deck_assembler;
        pub mod deck_package;
        pub mod deck_writer;
        pub mod flashcard;
    }
    pub mod infrastructure;
}

pub mod review {
    pub mod domain {
        pub mod context_document;
        pub mod flashcard_store;
        pub mod review_card;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod batch_deck_use_case;
    pub mod pipeline_logger;
    pub mod review_context_use_case;
    pub mod song_deck_use_case;
}
