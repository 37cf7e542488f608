//! Watch Manager
//!
//! - `WatchRoot` - a directory plus its extension filter and policy
//! - `EventRouter` - per-root callback: filter, report, maybe rebuild
//! - `WatchManager` - opens notify watches, skipping roots that fail
//! - `WatchSubscription` - a live watch, closed at most once

mod manager;
mod root;
mod router;
mod subscription;


pub use manager::WatchManager;
pub use root::WatchRoot;
pub use router::{EventRouter, RebuildTrigger, RouteDecision};
pub use subscription::{SubscriptionState, WatchSubscription};
