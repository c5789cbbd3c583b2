pub mod cli;
pub mod redact;
