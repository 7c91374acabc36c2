pub mod chat_completion_model;
