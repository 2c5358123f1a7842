//! `CREATE TABLE` text assembled from column metadata
//!
//! SQL Server keeps no definition text for tables, so the live catalog
//! rebuilds one in the exported layout: one `[column] type ...` line per
//! column, then the primary key constraint.

use azs_core::sql_utils::{quote_bracket, quote_qualified};

/// Column query for every base table in the schema bound to `@schema`,
/// ordered by table and column position.
pub const TABLE_COLUMNS_QUERY: &str = "SELECT c.TABLE_NAME, c.COLUMN_NAME, c.DATA_TYPE, \
     c.CHARACTER_MAXIMUM_LENGTH, c.NUMERIC_PRECISION, c.NUMERIC_SCALE, \
     c.IS_NULLABLE, c.COLUMN_DEFAULT, c.ORDINAL_POSITION, \
     pk.CONSTRAINT_NAME, pk.ORDINAL_POSITION \
     FROM INFORMATION_SCHEMA.COLUMNS c \
     JOIN INFORMATION_SCHEMA.TABLES t \
       ON t.TABLE_SCHEMA = c.TABLE_SCHEMA AND t.TABLE_NAME = c.TABLE_NAME \
      AND t.TABLE_TYPE = 'BASE TABLE' \
     LEFT JOIN ( \
       SELECT k.TABLE_SCHEMA, k.TABLE_NAME, k.COLUMN_NAME, k.CONSTRAINT_NAME, k.ORDINAL_POSITION \
       FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE k \
       JOIN INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc \
         ON tc.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA AND tc.CONSTRAINT_NAME = k.CONSTRAINT_NAME \
        AND tc.CONSTRAINT_TYPE = 'PRIMARY KEY' \
     ) pk ON pk.TABLE_SCHEMA = c.TABLE_SCHEMA AND pk.TABLE_NAME = c.TABLE_NAME \
         AND pk.COLUMN_NAME = c.COLUMN_NAME \
     WHERE c.TABLE_SCHEMA = @schema \
     ORDER BY c.TABLE_NAME, c.ORDINAL_POSITION";

/// One row of [`TABLE_COLUMNS_QUERY`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumnRow {
    pub table: String,
    pub column: String,
    pub data_type: String,
    /// `-1` for `(max)` types
    pub max_length: Option<i32>,
    pub precision: Option<u8>,
    pub scale: Option<i32>,
    /// `IS_NULLABLE = 'YES'`
    pub nullable: bool,
    /// Default expression as stored, e.g. `((0))`
    pub default: Option<String>,
    pub ordinal: i32,
    /// Primary key constraint name and key position, for key columns
    pub primary_key: Option<(String, i32)>,
}

impl TableColumnRow {
    /// Nullable column without length, default or key
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        data_type: impl Into<String>,
        ordinal: i32,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            data_type: data_type.into(),
            max_length: None,
            precision: None,
            scale: None,
            nullable: true,
            default: None,
            ordinal,
            primary_key: None,
        }
    }

    fn type_suffix(&self) -> Option<String> {
        match self.data_type.to_ascii_lowercase().as_str() {
            "char" | "nchar" | "varchar" | "nvarchar" | "binary" | "varbinary" => {
                self.max_length.map(|len| match len {
                    -1 => "(max)".to_string(),
                    len => format!("({})", len),
                })
            }
            "decimal" | "numeric" => self.precision.map(|precision| match self.scale {
                Some(scale) if scale > 0 => format!("({},{})", precision, scale),
                _ => format!("({})", precision),
            }),
            _ => None,
        }
    }

    /// `[column] type[(len)] [NOT NULL] [DEFAULT expr]`
    pub fn definition(&self) -> String {
        let mut def = format!("{} {}", quote_bracket(&self.column), self.data_type);
        if let Some(suffix) = self.type_suffix() {
            def.push_str(&suffix);
        }
        if !self.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            def.push_str(" DEFAULT ");
            def.push_str(default);
        }
        def
    }
}

/// Build the `CREATE TABLE` statement for one table from its column rows.
pub fn table_definition(schema: &str, table: &str, columns: &[TableColumnRow]) -> String {
    let mut columns: Vec<&TableColumnRow> = columns.iter().collect();
    columns.sort_by_key(|c| c.ordinal);

    let mut lines: Vec<String> = columns
        .iter()
        .map(|c| format!("    {}", c.definition()))
        .collect();

    let mut key: Vec<(&str, i32, &str)> = columns
        .iter()
        .filter_map(|c| {
            c.primary_key
                .as_ref()
                .map(|(name, position)| (name.as_str(), *position, c.column.as_str()))
        })
        .collect();
    let key_name = key.first().map(|&(name, _, _)| name);
    if let Some(name) = key_name {
        key.sort_by_key(|&(_, position, _)| position);
        let key_columns: Vec<String> = key.iter().map(|&(_, _, c)| quote_bracket(c)).collect();
        lines.push(format!(
            "    CONSTRAINT {} PRIMARY KEY ({})",
            quote_bracket(name),
            key_columns.join(", ")
        ));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);\n",
        quote_qualified(schema, table),
        lines.join(",\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(column: &str, data_type: &str, ordinal: i32) -> TableColumnRow {
        TableColumnRow::new("Orders", column, data_type, ordinal)
    }

    #[test]
    fn test_column_definitions() {
        let mut id = row("id", "int", 1);
        id.nullable = false;
        let mut note = row("note", "nvarchar", 2);
        note.max_length = Some(-1);
        let mut amount = row("amount", "decimal", 3);
        amount.precision = Some(10);
        amount.scale = Some(2);
        amount.nullable = false;
        amount.default = Some("((0))".to_string());
        let mut whole = row("whole", "numeric", 4);
        whole.precision = Some(8);
        whole.scale = Some(0);

        assert_eq!(id.definition(), "[id] int NOT NULL");
        assert_eq!(note.definition(), "[note] nvarchar(max)");
        assert_eq!(amount.definition(), "[amount] decimal(10,2) NOT NULL DEFAULT ((0))");
        assert_eq!(whole.definition(), "[whole] numeric(8)");
    }

    #[test]
    fn test_table_definition_orders_columns_and_key() {
        let mut line = row("line", "int", 2);
        line.nullable = false;
        line.primary_key = Some(("PK_Orders".to_string(), 2));
        let mut id = row("id", "int", 1);
        id.nullable = false;
        id.primary_key = Some(("PK_Orders".to_string(), 1));
        let mut code = row("code", "varchar", 3);
        code.max_length = Some(12);

        assert_eq!(
            table_definition("dbo", "Orders", &[line, code, id]),
            "CREATE TABLE [dbo].[Orders] (\n    [id] int NOT NULL,\n    [line] int NOT NULL,\n    [code] varchar(12),\n    CONSTRAINT [PK_Orders] PRIMARY KEY ([id], [line])\n);\n"
        );
    }

    #[test]
    fn test_table_without_key() {
        assert_eq!(
            table_definition("etl", "Stage", &[row("payload", "xml", 1)]),
            "CREATE TABLE [etl].[Stage] (\n    [payload] xml\n);\n"
        );
    }
}
