pub use connection::*;
pub use metadata::*;
pub use object_manager::*;

mod connection;
mod metadata;
mod object_manager;
