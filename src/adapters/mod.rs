//! Adapters — host implementations of the ambient ports.
//!
//! | Adapter | Implements | Connects to          |
//! |---------|------------|----------------------|
//! | `time`  | `Clock`    | `std::time::Instant` |

pub mod time;
