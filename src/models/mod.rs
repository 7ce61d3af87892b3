pub mod chat;

pub use chat::{ChatHistory, ChatMessage, ChatRequest, ChatResponse, MessageRole};
