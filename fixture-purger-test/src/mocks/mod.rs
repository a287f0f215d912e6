pub use connection::MockPurgeConnection;
pub use metadata::MockMetadataProvider;

mod connection;
mod metadata;
