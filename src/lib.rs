pub mod config;
pub mod export;
pub mod features;
pub mod output;
pub mod scoring;
pub mod stderr_buffer;
pub mod suggest;
pub mod table;
pub mod tui;
