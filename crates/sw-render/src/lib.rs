//! sw-render: container boundary for Soundweld
//!
//! Turns source file bytes into planar PCM through symphonia, and a
//! finished mix into artifacts: a canonical 16-bit WAV rendered
//! synchronously and a 128 kbit/s MP3 rendered on a worker thread with
//! streamed progress.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sw_render::{MediaKind, MixSession};
//!
//! let mut session = MixSession::new();
//! session.add_source("intro.mp3", bytes, MediaKind::Mp3)?;
//! let wav = session.generate_wav()?;
//! let mp3 = session.generate_mp3(|percent| println!("{percent}%"))?;
//! ```

mod decode;
mod error;
mod mp3;
mod pcm;
mod session;
mod wav;

pub use decode::*;
pub use error::*;
pub use mp3::*;
pub use pcm::*;
pub use session::*;
pub use wav::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
