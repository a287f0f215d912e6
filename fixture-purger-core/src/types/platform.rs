use std::fmt::{Display, Formatter};

use crate::{PurgeError, PurgeResult};

/// SQL platform (dialect) behind a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatabasePlatform {
    /// MySQL
    MySql,
    /// MariaDB
    MariaDb,
    /// PostgreSQL
    Postgres,
    /// SQLite
    Sqlite,
    /// Microsoft SQL Server
    SqlServer,
    /// Oracle
    Oracle,
    /// Any platform without dedicated support, by name
    Other(String),
}

impl DatabasePlatform {
    /// Whether foreign key checks must be switched off while tables are
    /// cleared. Only the MySQL family refuses to truncate a referenced table
    /// otherwise.
    pub fn requires_foreign_key_toggle(&self) -> bool {
        matches!(self, Self::MySql | Self::MariaDb)
    }

    /// Quote a single identifier.
    pub fn quote_identifier(&self, ident: &str) -> String {
        match self {
            Self::MySql | Self::MariaDb => format!("`{}`", ident.replace('`', "``")),
            Self::SqlServer => format!("[{}]", ident.replace(']', "]]")),
            _ => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    /// Statement emptying `table`, which must already be quoted. With
    /// `cascade` set, platforms that can also clear referencing tables are
    /// asked to.
    pub fn truncate_table_sql(&self, table: &str, cascade: bool) -> PurgeResult<String> {
        Ok(match self {
            Self::MySql | Self::MariaDb => format!("TRUNCATE {table}"),
            Self::Postgres if cascade => format!("TRUNCATE {table} CASCADE"),
            Self::Postgres => format!("TRUNCATE {table}"),
            // no TRUNCATE in sqlite; an unqualified DELETE hits the truncate optimization
            Self::Sqlite => format!("DELETE FROM {table}"),
            Self::SqlServer | Self::Oracle => format!("TRUNCATE TABLE {table}"),
            Self::Other(name) => return Err(PurgeError::UnsupportedPlatform(name.clone())),
        })
    }
}

impl Display for DatabasePlatform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MySql => f.write_str("mysql"),
            Self::MariaDb => f.write_str("mariadb"),
            Self::Postgres => f.write_str("postgresql"),
            Self::Sqlite => f.write_str("sqlite"),
            Self::SqlServer => f.write_str("mssql"),
            Self::Oracle => f.write_str("oracle"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_mysql_family_toggles_foreign_keys() {
        assert!(DatabasePlatform::MySql.requires_foreign_key_toggle());
        assert!(DatabasePlatform::MariaDb.requires_foreign_key_toggle());
        assert!(!DatabasePlatform::Postgres.requires_foreign_key_toggle());
        assert!(!DatabasePlatform::Sqlite.requires_foreign_key_toggle());
        assert!(!DatabasePlatform::SqlServer.requires_foreign_key_toggle());
        assert!(!DatabasePlatform::Other("db2".into()).requires_foreign_key_toggle());
    }

    #[test]
    fn truncate_statements() {
        let cases = [
            (DatabasePlatform::MySql, "TRUNCATE user"),
            (DatabasePlatform::MariaDb, "TRUNCATE user"),
            (DatabasePlatform::Postgres, "TRUNCATE user CASCADE"),
            (DatabasePlatform::Sqlite, "DELETE FROM user"),
            (DatabasePlatform::SqlServer, "TRUNCATE TABLE user"),
            (DatabasePlatform::Oracle, "TRUNCATE TABLE user"),
        ];
        for (platform, expected) in cases {
            assert_eq!(
                platform.truncate_table_sql("user", true).unwrap(),
                expected,
                "{platform}"
            );
        }
        assert_eq!(
            DatabasePlatform::Postgres
                .truncate_table_sql("user", false)
                .unwrap(),
            "TRUNCATE user"
        );
    }

    #[test]
    fn unknown_platform_cannot_truncate() {
        let err = DatabasePlatform::Other("db2".into())
            .truncate_table_sql("user", true)
            .unwrap_err();
        assert!(matches!(err, PurgeError::UnsupportedPlatform(ref name) if name == "db2"));
    }

    #[test]
    fn quote_escapes_embedded_quotes() {
        assert_eq!(DatabasePlatform::MySql.quote_identifier("a`b"), "`a``b`");
        assert_eq!(DatabasePlatform::Sqlite.quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(DatabasePlatform::SqlServer.quote_identifier("a]b"), "[a]]b]");
    }
}
