use std::any::Any;
use std::error::Error as StdError;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

/// The result of talking to the ORM or the database while purging.
pub type PurgeResult<T> = Result<T, PurgeError>;

/// Any driver or ORM error that can travel across threads.
pub trait PurgeCustomError: StdError + Send + Sync + Any {}

impl<E: StdError + Send + Sync + Any> PurgeCustomError for E {}

/// Boxed driver error held by a [`PurgeError`] variant.
#[repr(transparent)]
pub struct PurgeCustomErrorWrapper(Box<dyn PurgeCustomError>);

impl Debug for PurgeCustomErrorWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", AsRef::<dyn PurgeCustomError>::as_ref(&self))
    }
}

impl Display for PurgeCustomErrorWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", AsRef::<dyn PurgeCustomError>::as_ref(&self))
    }
}

impl StdError for PurgeCustomErrorWrapper {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl AsRef<dyn PurgeCustomError> for PurgeCustomErrorWrapper {
    fn as_ref(&self) -> &dyn PurgeCustomError {
        self.0.as_ref()
    }
}

impl Deref for PurgeCustomErrorWrapper {
    type Target = Box<dyn PurgeCustomError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
#[repr(transparent)]
struct StringError(&'static str);

impl Display for StringError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl StdError for StringError {}

/// Errors raised while discovering or clearing fixture tables.
#[derive(Debug, thiserror::Error)]
pub enum PurgeError {
    /// The ORM could not hand out its entity metadata
    #[error("Failed to load entity metadata: {0}")]
    Metadata(PurgeCustomErrorWrapper),
    /// The database could not be reached
    #[error("Database connection error: {0}")]
    Connection(PurgeCustomErrorWrapper),
    /// A single statement was rejected by the database
    #[error("Statement `{sql}` failed: {source}")]
    Statement {
        /// The SQL that was sent
        sql: String,
        /// Driver error
        #[source]
        source: PurgeCustomErrorWrapper,
    },
    /// The platform has no way to truncate a table
    #[error("Platform `{0}` does not support truncating tables")]
    UnsupportedPlatform(String),
    /// Clearing stopped part way through the table list
    #[error("Purge aborted after clearing {} table(s): {source}", .purged.len())]
    PartialPurge {
        /// Tables that were cleared before the failure, in purge order
        purged: Vec<String>,
        /// What stopped the purge
        #[source]
        source: Box<PurgeError>,
    },
}

impl PurgeError {
    /// Create a metadata error from any other existing error
    pub fn from_metadata<E: PurgeCustomError>(err: E) -> Self {
        Self::Metadata(PurgeCustomErrorWrapper(Box::new(err)))
    }

    /// Creates a metadata error from a static string
    pub fn from_metadata_str(err: &'static str) -> Self {
        Self::from_metadata(StringError(err))
    }

    /// Create a connection error from any other existing error
    pub fn from_connection<E: PurgeCustomError>(err: E) -> Self {
        Self::Connection(PurgeCustomErrorWrapper(Box::new(err)))
    }

    /// Creates a connection error from a static string
    pub fn from_connection_str(err: &'static str) -> Self {
        Self::from_connection(StringError(err))
    }

    /// Wrap a driver error raised while executing `sql`
    pub fn statement<E: PurgeCustomError>(sql: impl Into<String>, err: E) -> Self {
        Self::Statement {
            sql: sql.into(),
            source: PurgeCustomErrorWrapper(Box::new(err)),
        }
    }

    /// Wrap a static driver message raised while executing `sql`
    pub fn statement_str(sql: impl Into<String>, err: &'static str) -> Self {
        Self::statement(sql, StringError(err))
    }

    /// Tables that were cleared before this error was raised. Empty unless
    /// the purge got part way through its table list.
    pub fn purged_tables(&self) -> &[String] {
        match self {
            Self::PartialPurge { purged, .. } => purged,
            _ => &[],
        }
    }

    /// The SQL statement that failed, if the error came from executing one.
    pub fn failed_sql(&self) -> Option<&str> {
        match self {
            Self::Statement { sql, .. } => Some(sql),
            Self::PartialPurge { source, .. } => source.failed_sql(),
            _ => None,
        }
    }
}
