//! # State Module
//!
//! One state type per screen. Each is a plain value owned by its screen;
//! nothing here is shared or global.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │  DashboardState  │  │     Scanner      │  │       Cart       │      │
//! │  │                  │  │                  │  │                  │      │
//! │  │  items, filters  │  │  ScanForm        │  │  CartLine[]      │      │
//! │  │  edit dialog     │  │  last ScanError  │  │  total()         │      │
//! │  │  toast           │  │  CameraSession   │  │  checkout()      │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! │      Dashboard +            Scanner              POS screen            │
//! │      Reports screens        screen                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod dashboard;
mod scanner;

pub use cart::{Cart, CartLine, Receipt};
pub use dashboard::{
    Action, DashboardState, EditField, EditForm, Notification, NotificationKind, Report,
    NOTIFICATION_TTL_SECS,
};
pub use scanner::{scan_once, Camera, CameraSession, Decoded, ScanForm, Scanner, Submission};
