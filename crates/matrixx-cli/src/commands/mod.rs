pub mod chat;
pub mod config;
pub mod driver;
pub mod history;
pub mod interview;
pub mod tools;
