use crate::commands::Command;

/// Network-backed work for the worker. `id` ties the reply to the input line.
#[derive(Debug, Clone)]
pub struct NetworkRequest {
    pub id: u64,
    pub command: Command,
}

#[derive(Debug)]
pub enum NetworkResponse {
    Reply { id: u64, text: String },
    Error { id: u64, message: String },
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Line(String),
    Closed,
}
