pub use connection::*;
pub use manager::*;
pub use registry::*;

mod connection;
mod manager;
mod registry;
