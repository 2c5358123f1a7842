use super::*;

const ACTUAL: &str = "CREATE TABLE [dbo].[Orders] (
    [id] int NOT NULL,
    [qty] int,
    [note] nvarchar(100),
    CONSTRAINT [PK_Orders] PRIMARY KEY ([id])
);
";

fn generate(desired: &str, actual: &str) -> Vec<String> {
    ColumnAlterGenerator.alter_statements(desired, actual, "dbo", "Orders")
}

#[test]
fn test_identical_tables_produce_nothing() {
    assert!(generate(ACTUAL, ACTUAL).is_empty());
}

#[test]
fn test_case_and_whitespace_ignored() {
    let desired = "CREATE TABLE [dbo].[Orders] ([ID] INT NOT NULL, [qty]   int, [note] NVARCHAR(100),
        CONSTRAINT [PK_Orders] PRIMARY KEY ([id]))";
    assert!(generate(desired, ACTUAL).is_empty());
}

#[test]
fn test_added_column() {
    let desired = ACTUAL.replace("[note] nvarchar(100),", "[note] nvarchar(100),\n    [amount] decimal(10,2) NOT NULL,");
    assert_eq!(
        generate(&desired, ACTUAL),
        vec!["ALTER TABLE [dbo].[Orders] ADD [amount] decimal(10,2) NOT NULL;"]
    );
}

#[test]
fn test_dropped_column() {
    let desired = ACTUAL.replace("    [note] nvarchar(100),\n", "");
    assert_eq!(
        generate(&desired, ACTUAL),
        vec!["ALTER TABLE [dbo].[Orders] DROP COLUMN [note];"]
    );
}

#[test]
fn test_altered_column_strips_default() {
    let desired = ACTUAL.replace("[qty] int,", "[qty] bigint NOT NULL DEFAULT ((0)),");
    assert_eq!(
        generate(&desired, ACTUAL),
        vec!["ALTER TABLE [dbo].[Orders] ALTER COLUMN [qty] bigint NOT NULL;"]
    );
}

#[test]
fn test_named_default_and_identity_stripped() {
    let actual = "CREATE TABLE [dbo].[Orders] ([id] int IDENTITY(1,1) NOT NULL, [note] nvarchar(10))";
    let desired = "CREATE TABLE [dbo].[Orders] ([id] bigint IDENTITY(1,1) NOT NULL, \
                   [note] nvarchar(20) CONSTRAINT [DF_note] DEFAULT N'it''s' NULL)";
    assert_eq!(
        generate(desired, actual),
        vec![
            "ALTER TABLE [dbo].[Orders] ALTER COLUMN [id] bigint NOT NULL;",
            "ALTER TABLE [dbo].[Orders] ALTER COLUMN [note] nvarchar(20) NULL;",
        ]
    );
}

#[test]
fn test_default_only_change_not_altered() {
    let desired = ACTUAL.replace("[qty] int,", "[qty] int DEFAULT 1,");
    assert!(generate(&desired, ACTUAL).is_empty());
}

#[test]
fn test_changed_primary_key_dropped_then_added() {
    let desired = "CREATE TABLE [dbo].[Orders] (
    [id] int NOT NULL,
    [line] int NOT NULL,
    [qty] int,
    [note] nvarchar(100),
    CONSTRAINT [PK_Orders] PRIMARY KEY ([id], [line])
);
";
    assert_eq!(
        generate(desired, ACTUAL),
        vec![
            "ALTER TABLE [dbo].[Orders] DROP CONSTRAINT [PK_Orders];",
            "ALTER TABLE [dbo].[Orders] ADD [line] int NOT NULL;",
            "ALTER TABLE [dbo].[Orders] ADD CONSTRAINT [PK_Orders] PRIMARY KEY ([id], [line]);",
        ]
    );
}

#[test]
fn test_statement_order() {
    let actual = "CREATE TABLE dbo.Orders (
    id int NOT NULL,
    legacy int,
    qty int,
    CONSTRAINT UQ_legacy UNIQUE (legacy)
)";
    let desired = "CREATE TABLE dbo.Orders (
    id int NOT NULL,
    qty bigint,
    added nvarchar(5),
    CONSTRAINT CK_qty CHECK (qty >= 0)
)";
    assert_eq!(
        generate(desired, actual),
        vec![
            "ALTER TABLE [dbo].[Orders] DROP CONSTRAINT [UQ_legacy];",
            "ALTER TABLE [dbo].[Orders] DROP COLUMN [legacy];",
            "ALTER TABLE [dbo].[Orders] ADD added nvarchar(5);",
            "ALTER TABLE [dbo].[Orders] ALTER COLUMN qty bigint;",
            "ALTER TABLE [dbo].[Orders] ADD CONSTRAINT CK_qty CHECK (qty >= 0);",
        ]
    );
}

#[test]
fn test_unnamed_constraint_removal_skipped() {
    let actual = "CREATE TABLE dbo.Orders (id int, UNIQUE (id))";
    let desired = "CREATE TABLE dbo.Orders (id int)";
    assert!(generate(desired, actual).is_empty());
}

#[test]
fn test_unparseable_definition_yields_nothing() {
    assert!(generate("CREATE TABLE dbo.Orders", ACTUAL).is_empty());
    assert!(generate(ACTUAL, "-- not a table").is_empty());
}

#[test]
fn test_split_top_level_respects_nesting() {
    assert_eq!(
        split_top_level("a decimal(10,2), b nvarchar(5) DEFAULT 'x,y', [c,d] int", ','),
        vec!["a decimal(10,2)", " b nvarchar(5) DEFAULT 'x,y'", " [c,d] int"]
    );
}

#[test]
fn test_table_body_skips_bracketed_parens() {
    assert_eq!(
        table_body("CREATE TABLE [dbo].[odd(name] (id int)"),
        Some("id int")
    );
}
