pub mod config;
pub mod download_client;
pub mod error;
pub mod launcher;
pub mod loader;
pub mod logging;
pub mod request;

#[cfg(test)]
pub mod test_helpers;
