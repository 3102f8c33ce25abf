//! # stockroom-ui: Presentation State
//!
//! The client half of Stockroom: screen state as plain values, plus the
//! HTTP client and CSV export the screens use.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Browser / Shell                                     │
//! │        renders state, forwards input as Actions                        │
//! │                            │                                            │
//! │  ┌─────────────────────────▼───────────────────────────────────────┐   │
//! │  │               stockroom-ui (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   state::DashboardState   state::Scanner   state::Cart          │   │
//! │  │   export::write_csv       client::InventoryClient               │   │
//! │  └─────────────────────────┬───────────────────────────────────────┘   │
//! │                            │ HTTP/JSON                                  │
//! │                            ▼                                            │
//! │                     stockroom-server                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`] - Dashboard reducer, scanner workflow, POS cart
//! - [`client`] - `InventoryClient` over reqwest
//! - [`export`] - CSV export
//! - [`error`] - Client-side error types

pub mod client;
pub mod error;
pub mod export;
pub mod state;

pub use client::InventoryClient;
pub use error::{CartError, ClientError, ExportError, ScanError};
