//! Schema model consumed by the issue detection engine.
//!
//! These structures are produced by an introspection adapter (or built by
//! hand in tests) and are only ever read by the rules. Columns are owned by
//! their table; the engine always evaluates a column together with the table
//! that contains it, so no back-reference is stored.

use serde::{Deserialize, Serialize};

/// Semantic column type used by the rules.
///
/// Adapters map vendor type names onto this enum; anything they cannot
/// classify becomes [`ColumnType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    /// INTEGER, BIGINT, SMALLINT, ...
    Integer,
    /// DECIMAL / NUMERIC with optional precision and scale
    Decimal,
    /// FLOAT, REAL, DOUBLE PRECISION
    Float,
    /// VARCHAR, CHAR, TEXT
    Text,
    /// DATE, TIME, TIMESTAMP
    Temporal,
    /// BOOLEAN
    Boolean,
    /// Anything else (binary, JSON, UUID, vendor types, unknown)
    Other,
}

impl ColumnType {
    /// Stable upper-case label used in issue text.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Float => "FLOAT",
            ColumnType::Text => "TEXT",
            ColumnType::Temporal => "TEMPORAL",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared column type: semantic kind plus the raw vendor spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    /// Semantic classification the rules match on
    pub kind: ColumnType,
    /// Type name exactly as reported by the catalog, e.g. `varchar(255)`
    pub raw: String,
    /// DECIMAL precision, or the length of a sized character type
    pub precision: Option<u32>,
    /// DECIMAL scale
    pub scale: Option<u32>,
}

impl DataType {
    /// Creates a data type without precision or scale.
    pub fn new(kind: ColumnType, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            precision: None,
            scale: None,
        }
    }

    /// Creates a `DECIMAL(precision, scale)` type.
    pub fn decimal(precision: u32, scale: u32) -> Self {
        Self {
            kind: ColumnType::Decimal,
            raw: format!("DECIMAL({}, {})", precision, scale),
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    /// Returns false for a DECIMAL whose precision is zero, below its scale,
    /// or missing while a scale is set. Other kinds always pass.
    pub fn has_valid_decimal_parameters(&self) -> bool {
        if self.kind != ColumnType::Decimal {
            return true;
        }
        match (self.precision, self.scale) {
            (Some(0), _) | (None, Some(_)) => false,
            (Some(precision), Some(scale)) => scale <= precision,
            _ => true,
        }
    }

    /// Drops DECIMAL precision and scale that fail
    /// [`has_valid_decimal_parameters`](Self::has_valid_decimal_parameters),
    /// keeping the raw spelling.
    pub fn without_invalid_decimal_parameters(mut self) -> Self {
        if !self.has_valid_decimal_parameters() {
            self.precision = None;
            self.scale = None;
        }
        self
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.raw.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            f.write_str(&self.raw)
        }
    }
}

/// Table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,
    pub data_type: DataType,
    /// False when the column is NOT NULL
    pub is_nullable: bool,
    /// Default expression as written in the catalog
    pub default_value: Option<String>,
    /// 1-based position in the table
    pub ordinal_position: u32,
}

impl Column {
    /// Creates a nullable column with no default.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_nullable: true,
            default_value: None,
            ordinal_position: 0,
        }
    }

    /// Builder method to mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    /// Builder method to set the default value expression.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

/// Kinds of table constraints understood by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    /// PRIMARY KEY
    PrimaryKey,
    /// FOREIGN KEY with a [`ForeignKeyReference`]
    ForeignKey,
    /// UNIQUE, including unique constraints recovered from indexes
    Unique,
    /// CHECK; may cover no columns
    Check,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::PrimaryKey => write!(f, "PRIMARY KEY"),
            ConstraintKind::ForeignKey => write!(f, "FOREIGN KEY"),
            ConstraintKind::Unique => write!(f, "UNIQUE"),
            ConstraintKind::Check => write!(f, "CHECK"),
        }
    }
}

/// Target of a foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyReference {
    /// Referenced table
    pub table: String,
    /// Referenced columns; empty when the target's primary key is implied
    pub columns: Vec<String>,
}

/// Table constraint.
///
/// `columns` are names of columns in the owning table, in constraint order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Catalog name, when the backend reports one
    pub name: Option<String>,
    pub kind: ConstraintKind,
    /// Covered columns of the owning table
    pub columns: Vec<String>,
    /// Set for foreign keys only
    pub references: Option<ForeignKeyReference>,
    /// Set for check constraints when the catalog exposes the clause
    pub check_clause: Option<String>,
}

impl Constraint {
    fn of_kind(kind: ConstraintKind, columns: Vec<String>) -> Self {
        Self {
            name: None,
            kind,
            columns,
            references: None,
            check_clause: None,
        }
    }

    /// Creates a primary key over the given columns.
    pub fn primary_key<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of_kind(
            ConstraintKind::PrimaryKey,
            columns.into_iter().map(Into::into).collect(),
        )
    }

    /// Creates a unique constraint over the given columns.
    pub fn unique<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of_kind(
            ConstraintKind::Unique,
            columns.into_iter().map(Into::into).collect(),
        )
    }

    /// Creates a foreign key from `columns` to `referenced_table(referenced_columns)`.
    pub fn foreign_key<I, S, J, T>(
        columns: I,
        referenced_table: impl Into<String>,
        referenced_columns: J,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut constraint = Self::of_kind(
            ConstraintKind::ForeignKey,
            columns.into_iter().map(Into::into).collect(),
        );
        constraint.references = Some(ForeignKeyReference {
            table: referenced_table.into(),
            columns: referenced_columns.into_iter().map(Into::into).collect(),
        });
        constraint
    }

    /// Creates a check constraint.
    pub fn check<I, S>(columns: I, clause: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut constraint = Self::of_kind(
            ConstraintKind::Check,
            columns.into_iter().map(Into::into).collect(),
        );
        constraint.check_clause = clause;
        constraint
    }

    /// Builder method to set the constraint name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if the constraint covers `column`.
    pub fn covers(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Table index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name
    pub name: String,
    /// Indexed columns in key order
    pub columns: Vec<String>,
    /// True for unique indexes
    pub is_unique: bool,
}

impl Index {
    /// Creates a non-unique index.
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            is_unique: false,
        }
    }

    /// Builder method to mark the index unique.
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Returns the first key column, if any.
    pub fn leading_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }
}

/// Database table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name, qualified with its schema when outside the default one
    pub name: String,
    /// Columns in declared order
    pub columns: Vec<Column>,
    /// Indexes, including ones backing constraints
    pub indexes: Vec<Index>,
    /// Constraints declared on this table
    pub constraints: Vec<Constraint>,
}

impl Table {
    /// Creates an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Appends a column, assigning its ordinal position.
    pub fn with_column(mut self, mut column: Column) -> Self {
        column.ordinal_position = u32::try_from(self.columns.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        self.columns.push(column);
        self
    }

    /// Appends a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends an index.
    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Iterates the constraints of one kind.
    pub fn constraints_of(&self, kind: ConstraintKind) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(move |c| c.kind == kind)
    }

    /// Returns true if any constraint of `kind` covers `column`.
    pub fn is_covered_by(&self, kind: ConstraintKind, column: &str) -> bool {
        self.constraints_of(kind).any(|c| c.covers(column))
    }

    /// Returns true if `column` is the leading key column of some index.
    pub fn has_leading_index(&self, column: &str) -> bool {
        self.indexes
            .iter()
            .any(|index| index.leading_column() == Some(column))
    }

    /// Returns true if `column` appears anywhere in some index.
    pub fn is_indexed(&self, column: &str) -> bool {
        self.indexes
            .iter()
            .any(|index| index.columns.iter().any(|c| c == column))
    }
}

/// Complete schema handed to the rule engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    /// Database name, when the adapter knows it
    pub name: Option<String>,
    /// Tables in catalog order
    pub tables: Vec<Table>,
}

impl DatabaseSchema {
    /// Creates a schema from tables.
    pub fn new(tables: Vec<Table>) -> Self {
        Self { name: None, tables }
    }

    /// Builder method to set the database name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}
