//! Database schema definitions
//!
//! The high score table is described by a [`TableSchema`] value rather than
//! hand-written DDL, so the same descriptor drives table creation and the
//! compatibility check run against an existing file.

/// SQLite storage class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
    Real,
}

impl SqlType {
    /// Get the declared type name
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
            SqlType::Real => "REAL",
        }
    }
}

/// Column constraint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// `PRIMARY KEY AUTOINCREMENT` - ids are never reused, even after deletes
    PrimaryKeyAutoincrement,
    NotNull,
    /// `DEFAULT <literal>`, literal is emitted verbatim
    Default(&'static str),
}

impl Constraint {
    fn as_sql(&self) -> String {
        match self {
            Constraint::PrimaryKeyAutoincrement => "PRIMARY KEY AUTOINCREMENT".to_string(),
            Constraint::NotNull => "NOT NULL".to_string(),
            Constraint::Default(literal) => format!("DEFAULT {}", literal),
        }
    }
}

/// One column of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub constraints: &'static [Constraint],
}

impl ColumnDef {
    pub fn is_primary_key(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| matches!(c, Constraint::PrimaryKeyAutoincrement))
    }

    pub fn is_not_null(&self) -> bool {
        self.constraints.iter().any(|c| matches!(c, Constraint::NotNull))
    }
}

/// Secondary index on a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexDef {
    pub name: &'static str,
    /// Column expressions, e.g. `"score DESC"`
    pub columns: &'static [&'static str],
}

/// A table and its indexes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub indexes: &'static [IndexDef],
}

impl TableSchema {
    /// `CREATE TABLE IF NOT EXISTS` statement for this table
    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|col| {
                let mut parts = vec![col.name.to_string(), col.sql_type.as_str().to_string()];
                parts.extend(col.constraints.iter().map(Constraint::as_sql));
                parts.join(" ")
            })
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            columns.join(",\n    ")
        )
    }

    /// `CREATE INDEX IF NOT EXISTS` statements for this table
    pub fn create_index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|idx| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {}({})",
                    idx.name,
                    self.name,
                    idx.columns.join(", ")
                )
            })
            .collect()
    }

    /// All schema creation statements, table first
    pub fn all_statements(&self) -> Vec<String> {
        let mut stmts = vec![self.create_table_sql()];
        stmts.extend(self.create_index_sql());
        stmts
    }

    /// Comma-separated column list in declaration order
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|col| col.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether the table must be declared with `AUTOINCREMENT`
    pub fn requires_autoincrement(&self) -> bool {
        self.columns.iter().any(ColumnDef::is_primary_key)
    }

    /// Compare against the columns reported by `PRAGMA table_info`,
    /// returning a description of the first difference.
    pub fn check_columns(&self, existing: &[ExistingColumn]) -> Option<String> {
        if existing.len() != self.columns.len() {
            return Some(format!(
                "table {} has {} columns, expected {}",
                self.name,
                existing.len(),
                self.columns.len()
            ));
        }

        for (col, found) in self.columns.iter().zip(existing) {
            if col.name != found.name {
                return Some(format!(
                    "table {}: expected column {}, found {}",
                    self.name, col.name, found.name
                ));
            }
            if !found.declared_type.eq_ignore_ascii_case(col.sql_type.as_str()) {
                return Some(format!(
                    "table {}: column {} has type {}, expected {}",
                    self.name,
                    found.name,
                    found.declared_type,
                    col.sql_type.as_str()
                ));
            }
            if found.primary_key != col.is_primary_key() {
                return Some(format!(
                    "table {}: column {} primary key mismatch",
                    self.name, found.name
                ));
            }
            if found.not_null != col.is_not_null() {
                return Some(format!(
                    "table {}: column {} NOT NULL mismatch",
                    self.name, found.name
                ));
            }
        }
        None
    }

    /// Check the stored `CREATE TABLE` text from `sqlite_master`
    pub fn check_table_sql(&self, sql: &str) -> Option<String> {
        if self.requires_autoincrement() && !sql.to_ascii_uppercase().contains("AUTOINCREMENT") {
            return Some(format!(
                "table {} is not declared AUTOINCREMENT, ids could be reused",
                self.name
            ));
        }
        None
    }
}

/// One row of `PRAGMA table_info` for an existing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingColumn {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// The high score table
pub const HIGH_SCORES: TableSchema = TableSchema {
    name: "high_scores",
    columns: &[
        ColumnDef {
            name: "id",
            sql_type: SqlType::Integer,
            constraints: &[Constraint::PrimaryKeyAutoincrement],
        },
        ColumnDef {
            name: "player_name",
            sql_type: SqlType::Text,
            constraints: &[Constraint::NotNull],
        },
        ColumnDef {
            name: "score",
            sql_type: SqlType::Integer,
            constraints: &[Constraint::NotNull],
        },
        ColumnDef {
            name: "level_name",
            sql_type: SqlType::Text,
            constraints: &[Constraint::NotNull, Constraint::Default("'Default'")],
        },
        // UTC timestamp stored as text
        ColumnDef {
            name: "achieved_at",
            sql_type: SqlType::Text,
            constraints: &[Constraint::NotNull],
        },
        ColumnDef {
            name: "completion_time",
            sql_type: SqlType::Real,
            constraints: &[Constraint::NotNull, Constraint::Default("0")],
        },
    ],
    indexes: &[
        IndexDef {
            name: "idx_high_scores_player",
            columns: &["player_name"],
        },
        IndexDef {
            name: "idx_high_scores_level",
            columns: &["level_name"],
        },
        IndexDef {
            name: "idx_high_scores_rank",
            columns: &["score DESC", "id"],
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn columns_of(schema: &TableSchema) -> Vec<ExistingColumn> {
        schema
            .columns
            .iter()
            .map(|c| ExistingColumn {
                name: c.name.to_string(),
                declared_type: c.sql_type.as_str().to_string(),
                not_null: c.is_not_null(),
                primary_key: c.is_primary_key(),
            })
            .collect()
    }

    #[test]
    fn test_create_table_sql() {
        let sql = HIGH_SCORES.create_table_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS high_scores ("));
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("level_name TEXT NOT NULL DEFAULT 'Default'"));
        assert!(sql.contains("completion_time REAL NOT NULL DEFAULT 0"));
    }

    #[test]
    fn test_index_sql() {
        let stmts = HIGH_SCORES.create_index_sql();
        assert_eq!(stmts.len(), 3);
        assert!(stmts.contains(
            &"CREATE INDEX IF NOT EXISTS idx_high_scores_rank ON high_scores(score DESC, id)"
                .to_string()
        ));
        assert_eq!(HIGH_SCORES.all_statements().len(), 4);
    }

    #[test]
    fn test_column_list() {
        assert_eq!(
            HIGH_SCORES.column_list(),
            "id, player_name, score, level_name, achieved_at, completion_time"
        );
    }

    #[test]
    fn test_check_table_sql_requires_autoincrement() {
        assert_eq!(HIGH_SCORES.check_table_sql(&HIGH_SCORES.create_table_sql()), None);
        assert!(HIGH_SCORES
            .check_table_sql("CREATE TABLE high_scores (id INTEGER PRIMARY KEY, score INTEGER)")
            .is_some());
    }

    #[test]
    fn test_check_columns() {
        let mut existing = columns_of(&HIGH_SCORES);
        assert_eq!(HIGH_SCORES.check_columns(&existing), None);

        // declared types are case-insensitive in SQLite
        existing[2].declared_type = "integer".to_string();
        assert_eq!(HIGH_SCORES.check_columns(&existing), None);

        existing[2].declared_type = "TEXT".to_string();
        assert!(HIGH_SCORES.check_columns(&existing).is_some());
        existing[2].declared_type = "INTEGER".to_string();

        existing[1].not_null = false;
        assert!(HIGH_SCORES.check_columns(&existing).is_some());
        existing[1].not_null = true;

        existing[0].primary_key = false;
        assert!(HIGH_SCORES.check_columns(&existing).is_some());
        existing[0].primary_key = true;

        existing.pop();
        assert!(HIGH_SCORES.check_columns(&existing).is_some());
    }
}
