//! # Shared Board Core
//!
//! Transport-free building blocks of the shared drawing board.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 board-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Action Model    │  Board Store             │
//! │  - DrawAction    │  - reset / append        │
//! │  - Colors        │  - Effective snapshot    │
//! ├─────────────────────────────────────────────┤
//! │  Connection      │  Protocol                │
//! │  - State         │  - Push channel frames   │
//! │  - Input throttle│  - REST payloads         │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod board;
pub mod error;
pub mod protocol;
pub mod state;
pub mod throttle;

pub use action::{is_hex_color, random_color, DrawAction};
pub use board::BoardStore;
pub use error::{BoardError, BoardResult};
pub use protocol::{ClientFrame, ColorResponse, ServerFrame, Topic};
pub use state::ConnectionState;
pub use throttle::InputThrottle;

/// Board core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
