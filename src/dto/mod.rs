pub mod action;
pub mod content;
pub mod health;
pub mod sse;
pub mod validation;
