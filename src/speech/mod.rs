//! Speech helpers for the mascot front end.
//!
//! Independent, stateless utilities: microphone transcription (speech-to-text)
//! and speech synthesis (text-to-speech). Neither is part of the query
//! pipeline.

mod stt;
mod tts;

pub use stt::SpeechTranscriber;
pub use tts::SpeechSynthesizer;
