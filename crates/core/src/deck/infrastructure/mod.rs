pub mod zip_deck_writer;
