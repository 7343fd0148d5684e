pub mod currency_mask;
pub mod navigation;
pub mod optimistic;
pub mod runtime;
pub mod simulate;
pub mod triggers;

pub use navigation::{NavTicket, NavigationCoordinator};
pub use optimistic::{OptimisticTracker, Resolution};
pub use runtime::Runtime;
