pub mod config;
pub mod event;
pub mod money;
pub mod navigation;
pub mod slot;
pub mod snapshot;
pub mod toast;

pub use config::*;
pub use event::*;
pub use money::*;
pub use navigation::*;
pub use slot::*;
pub use snapshot::*;
pub use toast::*;
