pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod filter;
pub mod model;
pub mod output;
pub mod session;
pub mod utils;

#[cfg(test)]
mod tests;
