//! External processes that make new nodes appear in the graph
//!
//! - A headless browser looping a silent page (capture node)
//! - A sound player (sound-effect playback node)

mod browser;
mod keepalive;
mod sound;

pub use browser::{BridgePage, BrowserProcess};
pub use keepalive::ensure_silent_wav;
pub use sound::SoundPlayer;
