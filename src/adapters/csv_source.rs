use crate::core::InventorySource;
use crate::domain::model::{BoxDataset, CycleMonth, InventoryRow, RawRecord, ReferenceRow};
use crate::utils::error::{PlannerError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::Value;
use std::collections::HashMap;

pub const REFERENCE_COLUMNS: [&str; 3] = ["item_name", "item_category", "servings_per_unit"];
pub const BOX_COLUMNS: [&str; 2] = ["item_name", "quantity"];
pub const MAIN_COLUMNS: [&str; 2] = ["item_name", "quantity_in_stock"];

/// Raw bytes of one CSV file and the path it was read from (for error messages).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }
}

/// In-memory copy of the reference, senior box and main inventory tables.
///
/// Rows are parsed again on every load, so one dataset can back any number of
/// independent plan runs.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    reference: SourceFile,
    boxes: HashMap<CycleMonth, SourceFile>,
    main: SourceFile,
}

impl CsvDataset {
    pub fn new(reference: SourceFile, main: SourceFile) -> Self {
        Self {
            reference,
            boxes: HashMap::new(),
            main,
        }
    }

    pub fn with_box(mut self, cycle: CycleMonth, file: SourceFile) -> Self {
        self.boxes.insert(cycle, file);
        self
    }
}

impl InventorySource for CsvDataset {
    fn load_reference(&self) -> Result<Vec<ReferenceRow>> {
        let table = Table::parse(&self.reference, &REFERENCE_COLUMNS)?;
        let rows = table
            .records
            .iter()
            .map(|record| ReferenceRow {
                item_name: table.cell(record, 0).to_string(),
                raw_category: table.cell(record, 1).to_string(),
                servings_per_unit: table.cell(record, 2).to_string(),
            })
            .collect();
        Ok(rows)
    }

    fn load_box_inventory(&self, cycle: CycleMonth) -> Result<BoxDataset> {
        let file = self.boxes.get(&cycle).ok_or_else(|| {
            PlannerError::data_source(format!("No senior box dataset loaded for cycle month {}.", cycle))
        })?;
        let table = Table::parse(file, &BOX_COLUMNS)?;

        Ok(BoxDataset {
            raw_records: table.records.iter().map(|record| table.raw_record(record)).collect(),
            rows: table.inventory_rows(),
        })
    }

    fn load_main_inventory(&self) -> Result<Vec<InventoryRow>> {
        let table = Table::parse(&self.main, &MAIN_COLUMNS)?;
        Ok(table.inventory_rows())
    }
}

struct Table {
    headers: StringRecord,
    /// Positions of the required columns, in the order they were requested.
    columns: Vec<usize>,
    records: Vec<StringRecord>,
}

impl Table {
    fn parse(file: &SourceFile, required: &[&str]) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .flexible(true)
            .from_reader(file.bytes.as_slice());

        let headers = reader
            .headers()
            .map_err(|e| PlannerError::data_source(format!("Error reading '{}': {}", file.path, e)))?
            .clone();

        let columns = required
            .iter()
            .map(|name| {
                headers.iter().position(|h| h == *name).ok_or_else(|| {
                    PlannerError::configuration(format!("Column '{}' missing in '{}'.", name, file.path))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let records = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| PlannerError::data_source(format!("Error reading '{}': {}", file.path, e)))?;

        Ok(Self {
            headers,
            columns,
            records,
        })
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: usize) -> &'r str {
        record.get(self.columns[column]).unwrap_or("")
    }

    /// `(item_name, quantity)` rows; both inventory tables put them first and second.
    fn inventory_rows(&self) -> Vec<InventoryRow> {
        self.records
            .iter()
            .map(|record| InventoryRow::new(self.cell(record, 0), self.cell(record, 1)))
            .collect()
    }

    fn raw_record(&self, record: &StringRecord) -> RawRecord {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.to_string(), typed_value(record.get(i).unwrap_or(""))))
            .collect()
    }
}

/// Echo value for a raw cell: integers and finite floats become numbers, empty
/// cells become null, anything else stays text.
fn typed_value(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = trimmed.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "item_name,item_category,servings_per_unit\n\
        Apple,seasonal & local fruits/vegetables,2\n\
        Rice,grains,abc\n";

    fn dataset(box_csv: &str, main_csv: &str) -> CsvDataset {
        CsvDataset::new(
            SourceFile::new("data/food_reference.csv", REFERENCE),
            SourceFile::new("data/main_inventory.csv", main_csv),
        )
        .with_box(CycleMonth::from_month(1), SourceFile::new("data/senior_box_month_1.csv", box_csv))
    }

    #[test]
    fn test_reference_rows_keep_raw_text() {
        let rows = dataset("item_name,quantity\n", "item_name,quantity_in_stock\n")
            .load_reference()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item_name, "Apple");
        assert_eq!(rows[1].servings_per_unit, "abc");
    }

    #[test]
    fn test_box_rows_and_raw_echo() {
        let data = dataset(
            "item_name,quantity,notes\nApple,5,fresh\nRice,2.5,\n",
            "item_name,quantity_in_stock\n",
        );

        let boxed = data.load_box_inventory(CycleMonth::from_month(4)).unwrap();

        assert_eq!(
            boxed.rows,
            vec![InventoryRow::new("Apple", "5"), InventoryRow::new("Rice", "2.5")]
        );
        let first = serde_json::to_string(&boxed.raw_records[0]).unwrap();
        assert_eq!(first, r#"{"item_name":"Apple","quantity":5,"notes":"fresh"}"#);
        assert_eq!(boxed.raw_records[1]["quantity"], serde_json::json!(2.5));
        assert_eq!(boxed.raw_records[1]["notes"], Value::Null);
    }

    #[test]
    fn test_columns_may_appear_in_any_order() {
        let data = dataset(
            "item_name,quantity\n",
            "quantity_in_stock, item_name \n12,Rice\n",
        );

        let rows = data.load_main_inventory().unwrap();
        assert_eq!(rows, vec![InventoryRow::new("Rice", "12")]);
    }

    #[test]
    fn test_missing_column_is_configuration_error() {
        let data = dataset("item_name,qty\nApple,5\n", "item_name,quantity_in_stock\n");

        let err = data.load_box_inventory(CycleMonth::from_month(1)).unwrap_err();
        match err {
            PlannerError::ConfigurationError { message } => {
                assert_eq!(message, "Column 'quantity' missing in 'data/senior_box_month_1.csv'.")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_absent_cycle_is_data_source_error() {
        let data = dataset("item_name,quantity\n", "item_name,quantity_in_stock\n");

        let err = data.load_box_inventory(CycleMonth::from_month(2)).unwrap_err();
        assert!(matches!(err, PlannerError::DataSourceError { .. }));
    }

    #[test]
    fn test_short_rows_read_as_blank_cells() {
        let data = dataset("item_name,quantity\nApple\n", "item_name,quantity_in_stock\n");

        let boxed = data.load_box_inventory(CycleMonth::from_month(1)).unwrap();
        assert_eq!(boxed.rows, vec![InventoryRow::new("Apple", "")]);
    }
}
