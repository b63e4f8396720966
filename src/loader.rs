use crate::cell::CellValue;
use crate::dataset::Dataset;
use crate::error::{DashboardError, DashboardResult};
use calamine::{Data, DataType, Reader, open_workbook_auto};
use chrono::Timelike;
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::path::Path;

/// Load a dataset from a CSV file
///
/// The first record is the header. Each remaining record becomes one row; blank
/// fields are empty cells, fields that parse as numbers are numeric cells and
/// everything else is kept as text.
///
/// # Arguments
/// * `filepath` - Path to the CSV file to load
///
/// # Returns
/// * `DashboardResult<Dataset>` - The loaded dataset or a `Load` error
///
/// # Examples
/// ```no_run
/// use dashboard::loader::from_csv;
///
/// match from_csv("metrics.csv") {
///     Ok(ds) => println!("Loaded {} rows", ds.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn from_csv(filepath: impl AsRef<Path>) -> DashboardResult<Dataset> {
    let path = filepath.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DashboardError::load(path, e))?;

    let mut records = reader.records();
    let header_record = records
        .next()
        .ok_or_else(|| DashboardError::load(path, "file is empty"))?
        .map_err(|e| DashboardError::load(path, e))?;
    let header: Vec<CellValue> = header_record
        .iter()
        .enumerate()
        .map(|(idx, field)| match idx {
            0 => field.trim_start_matches('\u{feff}'),
            _ => field,
        })
        .map(CellValue::text)
        .collect();

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for result in records {
        let record = result.map_err(|e| DashboardError::load(path, e))?;
        rows.push(record.iter().map(csv_cell).collect());
    }

    build_dataset(path, &header, rows)
}

/// Load a dataset from a spreadsheet workbook
///
/// Reads the first worksheet of any workbook format calamine understands
/// (xlsx, xlsm, xlsb, xls, ods).
///
/// # Arguments
/// * `filepath` - Path to the workbook
///
/// # Returns
/// * `DashboardResult<Dataset>` - The loaded dataset or a `Load` error
pub fn from_excel(filepath: impl AsRef<Path>) -> DashboardResult<Dataset> {
    let path = filepath.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| DashboardError::load(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DashboardError::load(path, "no worksheets found"))?
        .map_err(|e| DashboardError::load(path, e))?;

    let mut rows = range.rows();
    let header: Vec<CellValue> = rows
        .next()
        .ok_or_else(|| DashboardError::load(path, "worksheet is empty"))?
        .iter()
        .map(excel_cell)
        .collect();

    let rows = rows
        .map(|row| row.iter().map(excel_cell).collect())
        .collect();

    build_dataset(path, &header, rows)
}

/// Detect file type and load the appropriate format
///
/// # Examples
/// ```no_run
/// use dashboard::loader::load_dataset;
///
/// let dataset = load_dataset("Base de Dados.xlsx").expect("dataset");
/// println!("{} columns", dataset.columns().len());
/// ```
pub fn load_dataset(filepath: impl AsRef<Path>) -> DashboardResult<Dataset> {
    let path = filepath.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    let dataset = match extension.as_deref() {
        Some("csv") => from_csv(path),
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            from_excel(path)
        }
        Some(ext) => Err(DashboardError::load(
            path,
            format!("unsupported file extension: {}", ext),
        )),
        None => Err(DashboardError::load(path, "file has no extension")),
    }?;

    log::info!(
        "loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(dataset)
}

fn build_dataset(
    path: &Path,
    header: &[CellValue],
    rows: Vec<Vec<CellValue>>,
) -> DashboardResult<Dataset> {
    if header.iter().all(CellValue::is_empty) {
        return Err(DashboardError::load(path, "header row is empty"));
    }

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(header.len());
    for (idx, cell) in header.iter().enumerate() {
        let name = match cell.as_label().trim() {
            "" => format!("Unnamed: {}", idx),
            name => name.to_string(),
        };
        if !seen.insert(name.clone()) {
            return Err(DashboardError::load(
                path,
                format!("duplicate column name: {}", name),
            ));
        }
        columns.push(name);
    }

    let rows = rows
        .into_iter()
        .filter(|row: &Vec<CellValue>| !row.iter().all(CellValue::is_empty))
        .collect();

    Ok(Dataset::new(columns, rows))
}

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.time().num_seconds_from_midnight() == 0 => {
                CellValue::Text(dt.format("%Y-%m-%d").to_string())
            }
            Some(dt) => CellValue::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        // error cells and blanks
        _ => CellValue::Empty,
    }
}

fn csv_cell(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(num) if num.is_finite() => CellValue::Number(num),
        // inf, NaN and overflowing literals stay text
        _ => CellValue::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn quoted_fields_keep_commas_quotes_and_newlines() {
        let file = write_csv(
            "Mês,Unidade,Observação\nJan,\"Centro\nNorte\",\"say \"\"hi\"\", ok\"\nFev,Sul,\n",
        );
        let ds = load_dataset(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0][1], CellValue::text("Centro\nNorte"));
        assert_eq!(ds.rows()[0][2], CellValue::text("say \"hi\", ok"));
        assert_eq!(ds.rows()[1][0], CellValue::text("Fev"));
    }

    #[test]
    fn non_finite_numbers_stay_text() {
        for field in ["inf", "NaN", "1e400", "-infinity"] {
            assert_eq!(csv_cell(field), CellValue::text(field), "{}", field);
        }
        assert_eq!(csv_cell(" 2.5 "), CellValue::Number(2.5));
    }

    #[test]
    fn loads_csv_with_typed_cells() {
        let file = write_csv("Mês,Operador,Vendas Realizadas\nJan,Ana,10\nFev,,\n\n");
        let ds = load_dataset(file.path()).unwrap();

        assert_eq!(ds.columns(), ["Mês", "Operador", "Vendas Realizadas"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0][2], CellValue::Number(10.0));
        assert_eq!(ds.rows()[1][1], CellValue::Empty);
    }

    #[test]
    fn loads_first_worksheet_of_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Mês").unwrap();
        sheet.write_string(0, 1, "Unidade").unwrap();
        sheet.write_string(0, 2, "Insucessos").unwrap();
        sheet.write_string(1, 0, "Jan").unwrap();
        sheet.write_string(1, 1, "Centro").unwrap();
        sheet.write_number(1, 2, 3.0).unwrap();
        sheet.write_string(2, 0, "Fev").unwrap();
        sheet.write_string(2, 1, "Norte").unwrap();
        sheet.write_number(2, 2, 1.5).unwrap();
        workbook.save(&path).unwrap();

        let ds = load_dataset(&path).unwrap();
        assert_eq!(ds.columns(), ["Mês", "Unidade", "Insucessos"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[1][1], CellValue::text("Norte"));
        assert_eq!(ds.rows()[1][2], CellValue::Number(1.5));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_dataset("/nonexistent/base.xlsx").unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));
    }

    #[test]
    fn rejects_unknown_extensions_and_bad_headers() {
        let err = load_dataset("metrics.json").unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));

        let empty = write_csv("");
        assert!(matches!(
            load_dataset(empty.path()),
            Err(DashboardError::Load { .. })
        ));

        let duplicated = write_csv("Mês,Mês\nJan,Fev\n");
        assert!(matches!(
            load_dataset(duplicated.path()),
            Err(DashboardError::Load { .. })
        ));
    }
}
