//! Fixed-length video export: the recording state machine and the hosts it drives.

pub mod capture;
pub mod download;
pub mod ffmpeg;
pub mod state;
pub mod timers;
pub mod workflow;
