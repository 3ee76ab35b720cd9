//! OpenAI API integration.
//!
//! Every upstream call made by the relay goes through [`OpenAIClient`]:
//!
//! - Voice agent sessions (`/agents/{id}/sessions`, JSON offer)
//! - Realtime SDP exchange (`/realtime?model=...`, raw `application/sdp`)
//! - Ephemeral realtime sessions (`/realtime/sessions`)
//! - Transcription, chat completion and speech for the voice pipeline
//!
//! The module is organized into focused submodules:
//!
//! - [`config`]: Fixed models, voices, paths and sampling settings
//! - [`messages`]: Request/response types
//! - [`client`]: The `OpenAIClient` implementation
//!
//! # Example
//!
//! ```rust,no_run
//! use voice_relay::config::ServerConfig;
//! use voice_relay::core::openai::OpenAIClient;
//! use voice_relay::core::sdp::SdpOffer;
//!
//! # async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAIClient::new(&config)?;
//! let offer = SdpOffer::parse("v=0\r\no=- 0 0 IN IP4 127.0.0.1\r\n")?;
//! let answer = client.exchange_sdp(&offer).await?;
//! println!("{}", String::from_utf8_lossy(&answer.body));
//! # Ok(())
//! # }
//! ```

mod client;
pub mod config;
pub mod messages;


pub use client::OpenAIClient;
pub use config::{AudioOutputFormat, OpenAIVoice};
pub use messages::ClientSecret;
