pub mod anki_connect_store;
