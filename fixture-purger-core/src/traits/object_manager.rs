use std::fmt::Debug;

use auto_impl::auto_impl;

use crate::{MetadataProvider, PurgeConnection};

/// Handle on an ORM session: its metadata and the connection it persists
/// through.
#[auto_impl(&, Box, Arc)]
pub trait ObjectManager: Send + Sync + Debug {
    /// Entity metadata known to the session
    fn metadata_provider(&self) -> &dyn MetadataProvider;

    /// Connection the session persists through
    fn connection(&self) -> &dyn PurgeConnection;
}
