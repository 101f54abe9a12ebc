pub mod cli;
pub mod client;
pub mod core;
pub mod emotion;
pub mod session;
