//! Dataset comparison
//!
//! Expected-versus-actual comparison for tabular test data: a [`Schema`]
//! holds named [`Table`]s, a table holds [`Row`]s, a row holds named
//! [`Column`]s, some of which can be marked as key columns. Table and
//! column names match case-insensitively.
//!
//! ## Subset semantics
//!
//! The expected data is a contract, not a snapshot: every expected row
//! must be present, actual rows nothing expects are tolerated. The one
//! exception is an expected table WITHOUT rows, which asserts the actual
//! table is empty. Within a row, only expected columns are checked; extra
//! actual columns are ignored.
//!
//! ## Row matching
//!
//! Rows carry no identity, so matching is two passes over the actual rows,
//! each actual row consumable once:
//! 1. every expected row takes the first remaining actual row it fully
//!    matches
//! 2. every still unmatched expected row takes the best remaining actual
//!    row, scored by fewest key-column mismatches, then fewest differences
//!    overall, and reports the remaining differences against it
//!
//! An expected row left without any actual row is missing. Column values
//! compare through a strict [`ReflectionComparator`], so an expected `1`
//! matches an actual `1.0`.

use attest_core::{AttestError, AttestResult, Config, Value, ValueFormatter};

use crate::compare::ReflectionComparator;

/// A named column value, optionally marked as a key column.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    value: Value,
    key: bool,
}

impl Column {
    /// A regular column.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Column {
            name: name.into(),
            value: value.into(),
            key: false,
        }
    }

    /// A key column. Key columns weigh heaviest when picking the best
    /// matching actual row.
    pub fn key(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Column {
            name: name.into(),
            value: value.into(),
            key: true,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// True for key columns.
    pub fn is_key(&self) -> bool {
        self.key
    }
}

/// A row of named columns.
#[derive(Debug, Clone, Default)]
pub struct Row {
    columns: Vec<Column>,
}

impl Row {
    /// An empty row.
    pub fn new() -> Self {
        Row::default()
    }

    /// Builder-style column addition.
    pub fn with(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Look up a column by name, case-insensitively.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// True if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Compare this expected row against an actual row.
    ///
    /// Only the expected columns are checked; actual-only columns are
    /// ignored.
    pub fn compare(&self, actual: &Row) -> AttestResult<RowDifference> {
        self.compare_with(actual, &ReflectionComparator::strict())
    }

    fn compare_with(
        &self,
        actual: &Row,
        comparator: &ReflectionComparator,
    ) -> AttestResult<RowDifference> {
        let mut comparison = RowDifference {
            expected: self.clone(),
            missing_columns: Vec::new(),
            column_differences: Vec::new(),
            key_mismatches: 0,
        };
        for column in &self.columns {
            match actual.column(&column.name) {
                Some(actual_column) => {
                    if !comparator.is_equal(&column.value, &actual_column.value)? {
                        comparison.column_differences.push(ColumnDifference {
                            column: column.name.clone(),
                            expected: column.value.clone(),
                            actual: actual_column.value.clone(),
                        });
                        if column.key {
                            comparison.key_mismatches += 1;
                        }
                    }
                }
                None => {
                    comparison.missing_columns.push(column.name.clone());
                    if column.key {
                        comparison.key_mismatches += 1;
                    }
                }
            }
        }
        Ok(comparison)
    }
}

/// A value mismatch in one column.
#[derive(Debug, Clone)]
pub struct ColumnDifference {
    /// Column name.
    pub column: String,
    /// Expected value.
    pub expected: Value,
    /// Actual value.
    pub actual: Value,
}

/// Outcome of comparing an expected row against one actual row.
#[derive(Debug, Clone)]
pub struct RowDifference {
    expected: Row,
    missing_columns: Vec<String>,
    column_differences: Vec<ColumnDifference>,
    key_mismatches: usize,
}

impl RowDifference {
    /// True if every expected column was present and equal.
    pub fn is_match(&self) -> bool {
        self.missing_columns.is_empty() && self.column_differences.is_empty()
    }

    /// Key columns that were missing or differed.
    pub fn key_mismatch_count(&self) -> usize {
        self.key_mismatches
    }

    /// Missing and differing columns together.
    pub fn difference_count(&self) -> usize {
        self.missing_columns.len() + self.column_differences.len()
    }

    /// The expected row this comparison is for.
    pub fn expected_row(&self) -> &Row {
        &self.expected
    }

    /// Expected columns the actual row lacks.
    pub fn missing_columns(&self) -> &[String] {
        &self.missing_columns
    }

    /// Columns present on both sides with differing values.
    pub fn column_differences(&self) -> &[ColumnDifference] {
        &self.column_differences
    }

    fn score(&self) -> (usize, usize) {
        (self.key_mismatches, self.difference_count())
    }
}

/// A named table of rows.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    rows: Vec<Row>,
}

impl Table {
    /// An empty table. As an expectation, an empty table asserts the
    /// actual table has no rows.
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Builder-style row addition.
    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All rows in declaration order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Compare this expected table against an actual table.
    pub fn compare(&self, actual: &Table) -> AttestResult<TableDifference> {
        let comparator = ReflectionComparator::strict();
        let mut result = TableDifference {
            table: self.name.clone(),
            missing_rows: Vec::new(),
            best_matches: Vec::new(),
            unexpected_rows: Vec::new(),
        };
        if self.rows.is_empty() {
            result.unexpected_rows = actual.rows.clone();
            return Ok(result);
        }

        let mut available: Vec<usize> = (0..actual.rows.len()).collect();
        let mut unmatched: Vec<usize> = Vec::new();
        for (i, expected_row) in self.rows.iter().enumerate() {
            let mut matched = None;
            for (slot, &j) in available.iter().enumerate() {
                if expected_row
                    .compare_with(&actual.rows[j], &comparator)?
                    .is_match()
                {
                    matched = Some(slot);
                    break;
                }
            }
            match matched {
                Some(slot) => {
                    available.remove(slot);
                }
                None => unmatched.push(i),
            }
        }

        for i in unmatched {
            let expected_row = &self.rows[i];
            if available.is_empty() {
                result.missing_rows.push(expected_row.clone());
                continue;
            }
            let mut best: Option<(usize, RowDifference)> = None;
            for (slot, &j) in available.iter().enumerate() {
                let comparison = expected_row.compare_with(&actual.rows[j], &comparator)?;
                let better = match &best {
                    None => true,
                    Some((_, current)) => comparison.score() < current.score(),
                };
                if better {
                    best = Some((slot, comparison));
                }
            }
            if let Some((slot, comparison)) = best {
                available.remove(slot);
                result.best_matches.push(comparison);
            }
        }
        Ok(result)
    }
}

/// Outcome of comparing an expected table against an actual table.
#[derive(Debug, Clone)]
pub struct TableDifference {
    table: String,
    missing_rows: Vec<Row>,
    best_matches: Vec<RowDifference>,
    unexpected_rows: Vec<Row>,
}

impl TableDifference {
    /// True if every expected row found a full match.
    pub fn is_match(&self) -> bool {
        self.missing_rows.is_empty()
            && self.best_matches.is_empty()
            && self.unexpected_rows.is_empty()
    }

    /// Table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Expected rows no actual row was left for.
    pub fn missing_rows(&self) -> &[Row] {
        &self.missing_rows
    }

    /// Expected rows that only found a partial match, with the differences
    /// against their best matching actual row.
    pub fn best_matches(&self) -> &[RowDifference] {
        &self.best_matches
    }

    /// Actual rows in a table expected to be empty.
    pub fn unexpected_rows(&self) -> &[Row] {
        &self.unexpected_rows
    }

    fn render(&self, formatter: &ValueFormatter, out: &mut String) {
        out.push_str(&format!("Found differences for table {}:\n", self.table));
        for row in &self.missing_rows {
            out.push_str("  Missing row: ");
            out.push_str(&render_row(row, formatter));
            out.push('\n');
        }
        for comparison in &self.best_matches {
            out.push_str("  Different row: ");
            out.push_str(&render_row(&comparison.expected, formatter));
            out.push_str("\n    Best matching differences:\n");
            for difference in &comparison.column_differences {
                out.push_str(&format!(
                    "      {}: {} <-> {}\n",
                    difference.column,
                    formatter.format(&difference.expected),
                    formatter.format(&difference.actual)
                ));
            }
            for column in &comparison.missing_columns {
                let expected = comparison
                    .expected
                    .column(column)
                    .map(|c| formatter.format(c.value()))
                    .unwrap_or_default();
                out.push_str(&format!("      {}: {} <-> <missing>\n", column, expected));
            }
        }
        for row in &self.unexpected_rows {
            out.push_str("  Unexpected row: ");
            out.push_str(&render_row(row, formatter));
            out.push('\n');
        }
    }
}

fn render_row(row: &Row, formatter: &ValueFormatter) -> String {
    let mut out = String::from("[");
    for (i, column) in row.columns().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(column.name());
        out.push('=');
        out.push_str(&formatter.format(column.value()));
    }
    out.push(']');
    out
}

fn render_actual_content(table: &Table, formatter: &ValueFormatter, out: &mut String) {
    out.push_str(&format!("Actual content of table {}:\n", table.name));
    if table.rows.is_empty() {
        out.push_str("  <no rows>\n");
        return;
    }
    for row in &table.rows {
        out.push_str("  ");
        out.push_str(&render_row(row, formatter));
        out.push('\n');
    }
}

/// A named set of tables.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    tables: Vec<Table>,
}

impl Schema {
    /// An empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Schema {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Builder-style table addition.
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a table by name, case-insensitively.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// All tables in declaration order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Compare this expected schema against an actual schema. Actual-only
    /// tables are ignored.
    pub fn compare(&self, actual: &Schema) -> AttestResult<SchemaDifference> {
        let mut result = SchemaDifference {
            missing_tables: Vec::new(),
            failed_tables: Vec::new(),
        };
        for expected_table in &self.tables {
            match actual.table(&expected_table.name) {
                Some(actual_table) => {
                    let comparison = expected_table.compare(actual_table)?;
                    if !comparison.is_match() {
                        result.failed_tables.push(comparison);
                    }
                }
                None => result.missing_tables.push(expected_table.name.clone()),
            }
        }
        Ok(result)
    }
}

/// Outcome of comparing an expected schema against an actual schema.
#[derive(Debug, Clone)]
pub struct SchemaDifference {
    missing_tables: Vec<String>,
    failed_tables: Vec<TableDifference>,
}

impl SchemaDifference {
    /// True if every expected table exists and matches.
    pub fn is_match(&self) -> bool {
        self.missing_tables.is_empty() && self.failed_tables.is_empty()
    }

    /// Expected tables the actual schema lacks.
    pub fn missing_tables(&self) -> &[String] {
        &self.missing_tables
    }

    /// Tables that exist on both sides but differ.
    pub fn failed_tables(&self) -> &[TableDifference] {
        &self.failed_tables
    }
}

const DATASET_HEADER: &str =
    "Differences found between the expected data set and the actual data set.\n\n";

/// Assert that an actual table satisfies an expected table.
///
/// # Errors
///
/// Returns [`AttestError::AssertionFailed`] with a row-by-row report when
/// the table does not match.
pub fn assert_table_contents(expected: &Table, actual: &Table) -> AttestResult<()> {
    let comparison = expected.compare(actual)?;
    if comparison.is_match() {
        return Ok(());
    }
    tracing::debug!(
        target: "attest::dataset",
        table = %comparison.table(),
        "Dataset assertion failed"
    );
    let formatter = ValueFormatter::from_config(&Config::global().report);
    let mut report = String::from(DATASET_HEADER);
    comparison.render(&formatter, &mut report);
    report.push('\n');
    render_actual_content(actual, &formatter, &mut report);
    Err(AttestError::assertion(report))
}

/// Assert that an actual schema satisfies an expected schema.
///
/// # Errors
///
/// Returns [`AttestError::AssertionFailed`] listing missing tables and
/// per-table differences when the schema does not match.
pub fn assert_schema_contents(expected: &Schema, actual: &Schema) -> AttestResult<()> {
    let comparison = expected.compare(actual)?;
    if comparison.is_match() {
        return Ok(());
    }
    tracing::debug!(
        target: "attest::dataset",
        schema = %expected.name(),
        "Dataset assertion failed"
    );
    let formatter = ValueFormatter::from_config(&Config::global().report);
    let mut report = String::from(DATASET_HEADER);
    for table in &comparison.missing_tables {
        report.push_str(&format!("Found missing table {}\n", table));
    }
    for table_comparison in &comparison.failed_tables {
        table_comparison.render(&formatter, &mut report);
    }
    for table_comparison in &comparison.failed_tables {
        if let Some(table) = actual.table(table_comparison.table()) {
            report.push('\n');
            render_actual_content(table, &formatter, &mut report);
        }
    }
    Err(AttestError::assertion(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_row(id: i64, name: &str) -> Row {
        Row::new()
            .with(Column::key("id", id))
            .with(Column::new("name", name))
    }

    // ==== Row comparison ====

    #[test]
    fn matching_row_has_no_differences() {
        let expected = person_row(1, "jim");
        let actual = person_row(1, "jim");
        let comparison = expected.compare(&actual).unwrap();
        assert!(comparison.is_match());
        assert_eq!(comparison.difference_count(), 0);
    }

    #[test]
    fn extra_actual_columns_are_ignored() {
        let expected = Row::new().with(Column::new("name", "jim"));
        let actual = person_row(1, "jim");
        assert!(expected.compare(&actual).unwrap().is_match());
    }

    #[test]
    fn missing_and_differing_columns_are_recorded() {
        let expected = Row::new()
            .with(Column::key("id", 1))
            .with(Column::new("name", "jim"))
            .with(Column::new("age", 30));
        let actual = Row::new()
            .with(Column::key("id", 2))
            .with(Column::new("name", "jim"));

        let comparison = expected.compare(&actual).unwrap();
        assert!(!comparison.is_match());
        assert_eq!(comparison.key_mismatch_count(), 1);
        assert_eq!(comparison.difference_count(), 2);
        assert_eq!(comparison.missing_columns(), ["age"]);
        assert_eq!(comparison.column_differences()[0].column, "id");
    }

    #[test]
    fn column_names_match_case_insensitively() {
        let expected = Row::new().with(Column::new("NAME", "jim"));
        let actual = Row::new().with(Column::new("name", "jim"));
        assert!(expected.compare(&actual).unwrap().is_match());
    }

    #[test]
    fn integer_columns_match_float_columns() {
        let expected = Row::new().with(Column::new("amount", 1));
        let actual = Row::new().with(Column::new("amount", 1.0));
        assert!(expected.compare(&actual).unwrap().is_match());
    }

    // ==== Table comparison ====

    #[test]
    fn row_order_does_not_matter() {
        let expected = Table::new("person")
            .with_row(person_row(1, "jim"))
            .with_row(person_row(2, "ann"));
        let actual = Table::new("person")
            .with_row(person_row(2, "ann"))
            .with_row(person_row(1, "jim"));
        assert!(expected.compare(&actual).unwrap().is_match());
    }

    #[test]
    fn extra_actual_rows_are_tolerated() {
        let expected = Table::new("person").with_row(person_row(1, "jim"));
        let actual = Table::new("person")
            .with_row(person_row(1, "jim"))
            .with_row(person_row(2, "ann"));
        assert!(expected.compare(&actual).unwrap().is_match());
    }

    #[test]
    fn unmatched_expected_row_without_actuals_is_missing() {
        let expected = Table::new("person")
            .with_row(person_row(1, "jim"))
            .with_row(person_row(2, "ann"));
        let actual = Table::new("person").with_row(person_row(1, "jim"));

        let comparison = expected.compare(&actual).unwrap();
        assert!(!comparison.is_match());
        assert_eq!(comparison.missing_rows().len(), 1);
        let missing = &comparison.missing_rows()[0];
        assert_eq!(missing.column("id").unwrap().value(), &Value::Int(2));
    }

    #[test]
    fn best_match_prefers_matching_keys() {
        let expected = Table::new("person").with_row(person_row(1, "jim"));
        let actual = Table::new("person")
            .with_row(person_row(1, "ben"))
            .with_row(person_row(2, "jim"));

        let comparison = expected.compare(&actual).unwrap();
        assert_eq!(comparison.best_matches().len(), 1);
        let best = &comparison.best_matches()[0];
        assert_eq!(best.key_mismatch_count(), 0);
        assert_eq!(best.column_differences().len(), 1);
        assert_eq!(best.column_differences()[0].column, "name");
    }

    #[test]
    fn best_match_breaks_key_ties_by_total_differences() {
        let expected = Table::new("t").with_row(
            Row::new()
                .with(Column::new("a", 1))
                .with(Column::new("b", 2))
                .with(Column::new("c", 3)),
        );
        let near = Row::new()
            .with(Column::new("a", 1))
            .with(Column::new("b", 2))
            .with(Column::new("c", 9));
        let far = Row::new()
            .with(Column::new("a", 9))
            .with(Column::new("b", 9))
            .with(Column::new("c", 9));
        let actual = Table::new("t").with_row(far).with_row(near);

        let comparison = expected.compare(&actual).unwrap();
        let best = &comparison.best_matches()[0];
        assert_eq!(best.difference_count(), 1);
        assert_eq!(best.column_differences()[0].column, "c");
    }

    #[test]
    fn exact_matches_consume_before_best_matching() {
        // both expected rows could partially match the same actual row;
        // the exact pass must claim it for the right one first
        let expected = Table::new("t")
            .with_row(person_row(1, "jim"))
            .with_row(person_row(1, "ann"));
        let actual = Table::new("t")
            .with_row(person_row(1, "ann"))
            .with_row(person_row(3, "jim"));

        let comparison = expected.compare(&actual).unwrap();
        assert_eq!(comparison.best_matches().len(), 1);
        let best = &comparison.best_matches()[0];
        assert_eq!(
            best.expected_row().column("name").unwrap().value(),
            &Value::from("jim")
        );
    }

    #[test]
    fn empty_expected_table_asserts_emptiness() {
        let expected = Table::new("person");
        let actual = Table::new("person").with_row(person_row(1, "jim"));

        let comparison = expected.compare(&actual).unwrap();
        assert!(!comparison.is_match());
        assert_eq!(comparison.unexpected_rows().len(), 1);

        let err = assert_table_contents(&expected, &actual).unwrap_err();
        assert!(err.to_string().contains("Unexpected row: [id=1, name=\"jim\"]"));
    }

    // ==== Assertions and reports ====

    #[test]
    fn table_assert_reports_missing_and_different_rows() {
        let expected = Table::new("person")
            .with_row(person_row(1, "ben"))
            .with_row(person_row(2, "ann"));
        let actual = Table::new("person").with_row(person_row(1, "jim"));

        let err = assert_table_contents(&expected, &actual).unwrap_err();
        assert!(err.is_assertion_failure());
        let message = err.to_string();
        assert!(message.contains(
            "Differences found between the expected data set and the actual data set."
        ));
        assert!(message.contains("Found differences for table person:"));
        assert!(message.contains("Different row: [id=1, name=\"ben\"]"));
        assert!(message.contains("Best matching differences:"));
        assert!(message.contains("name: \"ben\" <-> \"jim\""));
        assert!(message.contains("Missing row: [id=2, name=\"ann\"]"));
        assert!(message.contains("Actual content of table person:"));
        assert!(message.contains("[id=1, name=\"jim\"]"));
    }

    #[test]
    fn schema_assert_reports_missing_tables() {
        let expected = Schema::new("expected")
            .with_table(Table::new("person").with_row(person_row(1, "jim")))
            .with_table(Table::new("orders"));
        let actual =
            Schema::new("actual").with_table(Table::new("PERSON").with_row(person_row(1, "jim")));

        let err = assert_schema_contents(&expected, &actual).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Found missing table orders"));
        // person matched despite the case difference
        assert!(!message.contains("Found differences for table person"));
    }

    #[test]
    fn schema_assert_appends_actual_table_content() {
        let expected =
            Schema::new("expected").with_table(Table::new("person").with_row(person_row(1, "ben")));
        let actual =
            Schema::new("actual").with_table(Table::new("person").with_row(person_row(1, "jim")));

        let err = assert_schema_contents(&expected, &actual).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Found differences for table person:"));
        assert!(message.contains("Actual content of table person:"));
        assert!(message.contains("[id=1, name=\"jim\"]"));
    }

    #[test]
    fn matching_schema_passes() {
        let expected =
            Schema::new("expected").with_table(Table::new("person").with_row(person_row(1, "jim")));
        let actual = Schema::new("actual").with_table(
            Table::new("person")
                .with_row(person_row(1, "jim"))
                .with_row(person_row(2, "extra")),
        );
        assert!(assert_schema_contents(&expected, &actual).is_ok());
    }
}
