//! Static table metadata for the portfolio store.
//!
//! Every table is described once, as a [`Table`] constant. The Postgres DDL,
//! the insertable shapes checked by [`validate`] and the column lists used by
//! the repositories are all derived from these descriptions.

pub mod tables;
pub mod validate;

pub use tables::*;
pub use validate::Insertable;

use std::fmt::Write;

// ───── Column Metadata ──────────────────────────────────────────────

/// Semantic column type as stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// Auto-incrementing integer identity.
    Serial,
    Integer,
    Text,
    Boolean,
    Timestamp,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Serial => "SERIAL",
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Timestamp => "TIMESTAMP",
        }
    }

    /// Name used in validation messages.
    pub fn describe(&self) -> &'static str {
        match self {
            SqlType::Serial | SqlType::Integer => "integer",
            SqlType::Text => "string",
            SqlType::Boolean => "boolean",
            SqlType::Timestamp => "timestamp",
        }
    }
}

/// Server-side default applied when a column is omitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Now,
    Bool(bool),
    Text(&'static str),
    Integer(i32),
}

impl DefaultValue {
    fn as_sql(&self) -> String {
        match self {
            DefaultValue::Now => "now()".to_string(),
            DefaultValue::Bool(b) => b.to_string(),
            DefaultValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            DefaultValue::Integer(i) => i.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Column name in the store (snake_case).
    pub name: &'static str,
    /// Field name in the key-value records exchanged with callers (camelCase).
    pub field: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub unique: bool,
    pub default: Option<DefaultValue>,
    pub references: Option<ForeignKey>,
    /// Accepted values for text columns constrained by convention only.
    pub choices: Option<&'static [&'static str]>,
}

impl Column {
    const fn new(name: &'static str, field: &'static str, sql_type: SqlType) -> Self {
        Column {
            name,
            field,
            sql_type,
            nullable: false,
            unique: false,
            default: None,
            references: None,
            choices: None,
        }
    }

    pub const fn serial(name: &'static str) -> Self {
        Column::new(name, name, SqlType::Serial)
    }

    pub const fn text(name: &'static str, field: &'static str) -> Self {
        Column::new(name, field, SqlType::Text)
    }

    pub const fn integer(name: &'static str, field: &'static str) -> Self {
        Column::new(name, field, SqlType::Integer)
    }

    pub const fn boolean(name: &'static str, field: &'static str) -> Self {
        Column::new(name, field, SqlType::Boolean)
    }

    pub const fn timestamp(name: &'static str, field: &'static str) -> Self {
        Column::new(name, field, SqlType::Timestamp)
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Defaulted columns stay nullable, matching the store layout.
    pub const fn default_to(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self.nullable = true;
        self
    }

    /// `now()` defaults keep the column NOT NULL.
    pub const fn default_now(mut self) -> Self {
        self.default = Some(DefaultValue::Now);
        self
    }

    pub const fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some(ForeignKey { table, column });
        self
    }

    pub const fn one_of(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Generated by the store; never accepted from callers.
    pub fn is_generated(&self) -> bool {
        self.sql_type == SqlType::Serial || self.default == Some(DefaultValue::Now)
    }

    pub fn is_insertable(&self) -> bool {
        !self.is_generated()
    }

    pub fn is_required_on_insert(&self) -> bool {
        self.is_insertable() && !self.nullable && self.default.is_none()
    }

    /// Column reference usable in SQL; reserved words are quoted.
    pub fn sql_name(&self) -> String {
        quote_ident(self.name)
    }

    /// Expression selecting this column so that defaulted columns never read as NULL.
    pub fn select_expr(&self) -> String {
        let name = self.sql_name();
        match self.default {
            Some(default) if default != DefaultValue::Now => {
                format!("COALESCE({name}, {}) AS {name}", default.as_sql())
            }
            _ => name,
        }
    }

    fn definition(&self, single_primary_key: bool) -> String {
        let mut def = format!("{} {}", self.sql_name(), self.sql_type.as_sql());
        if self.sql_type == SqlType::Serial && single_primary_key {
            def.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            def.push_str(" NOT NULL");
        }
        if self.unique {
            def.push_str(" UNIQUE");
        }
        if let Some(default) = &self.default {
            let _ = write!(def, " DEFAULT {}", default.as_sql());
        }
        if let Some(fk) = &self.references {
            let _ = write!(def, " REFERENCES {}({})", quote_ident(fk.table), quote_ident(fk.column));
        }
        def
    }
}

// ───── Table Metadata ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub primary_key: &'static [&'static str],
}

impl Table {
    pub fn insertable_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_insertable())
    }

    pub fn required_fields(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| c.is_required_on_insert())
            .map(|c| c.field)
            .collect()
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = (&Column, ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.references.map(|fk| (c, fk)))
    }

    /// Comma-separated select list for every column.
    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(Column::select_expr)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `INSERT ... RETURNING` statement over the given columns, binding `$1..$n`.
    pub fn insert_statement(&self, columns: &[&str]) -> String {
        let names = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let params = (1..=columns.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "INSERT INTO {} ({names}) VALUES ({params}) RETURNING {}",
            quote_ident(self.name),
            self.select_list()
        )
    }

    pub fn create_statement(&self) -> String {
        let single_pk = self.primary_key.len() == 1;
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("    {}", c.definition(single_pk)))
            .collect();

        if !single_pk {
            let pk = self
                .primary_key
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("    PRIMARY KEY ({pk})"));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            quote_ident(self.name),
            lines.join(",\n")
        )
    }
}

/// DDL for every table, in dependency order.
pub fn schema_ddl() -> String {
    TABLES
        .iter()
        .map(|t| format!("{};\n", t.create_statement()))
        .collect::<Vec<_>>()
        .join("\n")
}

const RESERVED: &[&str] = &["order", "type", "user"];

fn quote_ident(ident: &str) -> String {
    if RESERVED.contains(&ident) {
        format!("\"{ident}\"")
    } else {
        ident.to_string()
    }
}
