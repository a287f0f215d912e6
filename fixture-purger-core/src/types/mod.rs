pub use metadata::*;
pub use platform::*;
pub use purge_mode::*;

mod metadata;
mod platform;
mod purge_mode;
