pub mod bijoy;
pub mod config;
pub mod consts;
pub mod error;
pub mod metrics;
pub mod prompt;
pub mod replay;
pub mod simulate;
pub mod text;
pub mod typist;
// cmd and reports belong to the binary (main.rs).

pub use crate::bijoy::Transliterator;
pub use crate::config::{InputMethod, SessionConfig};
pub use crate::metrics::{Session, SessionResult};
pub use crate::prompt::Prompt;
pub use crate::replay::Replay;
pub use crate::typist::{Key, Typist};
