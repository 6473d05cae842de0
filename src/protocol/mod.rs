//! Protocol-level building blocks

pub mod rtsp;
