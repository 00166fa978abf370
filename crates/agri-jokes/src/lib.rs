//! Demo integration with the public Chuck Norris joke API.

pub mod client;
pub mod error;
pub mod types;

pub use client::{JokeClient, JokeClientConfig, DEFAULT_JOKE_DELAY};
pub use error::JokeError;
pub use types::ChuckNorrisJoke;
