//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod index;
mod init;
mod listen;
mod serve;
mod speak;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use index::run_index;
pub use init::run_init;
pub use listen::run_listen;
pub use serve::run_serve;
pub use speak::run_speak;
