//! Desktop host glue: chat-completion client, terminal input, frame
//! presentation, and environment configuration.

pub mod audio;
pub mod config;
pub mod input;
pub mod network;
pub mod platform;
