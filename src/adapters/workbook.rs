use crate::domain::model::{CellUpdate, SheetCell, SheetRow, TrackerSheet};
use crate::domain::ports::Workbook;
use crate::utils::error::{EtlError, Result};
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Hyperlink, Spreadsheet, Worksheet};

const LINK_COLOR: &str = "FF0000FF";

/// The tracker workbook on disk. Only the first worksheet is read or written.
pub struct XlsxWorkbook {
    path: PathBuf,
    book: Spreadsheet,
}

impl XlsxWorkbook {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(EtlError::WorkbookError {
                path: path.display().to_string(),
                message: "File not found".to_string(),
            });
        }

        let book = umya_spreadsheet::reader::xlsx::read(&path)
            .map_err(|e| Self::error(&path, format!("Failed to read workbook: {}", e)))?;
        tracing::info!("📖 Loaded workbook {}", path.display());

        Ok(Self { path, book })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(path: &Path, message: String) -> EtlError {
        EtlError::WorkbookError {
            path: path.display().to_string(),
            message,
        }
    }

    fn sheet(&self) -> Result<&Worksheet> {
        self.book
            .get_sheet(&0)
            .ok_or_else(|| Self::error(&self.path, "Workbook has no worksheets".to_string()))
    }

    fn read_cell(sheet: &Worksheet, column: u32, row: u32) -> Option<SheetCell> {
        let cell = sheet.get_cell((column, row))?;
        let value = cell.get_value().trim().to_string();
        let hyperlink = cell
            .get_hyperlink()
            .map(|link| link.get_url().trim().to_string())
            .filter(|url| !url.is_empty());

        if value.is_empty() && hyperlink.is_none() {
            return None;
        }

        Some(SheetCell {
            value: Some(value).filter(|v| !v.is_empty()),
            hyperlink,
        })
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workbook.xlsx".to_string());
        self.path.with_file_name(format!(".{}.saving", file_name))
    }
}

impl Workbook for XlsxWorkbook {
    fn load(&self) -> Result<TrackerSheet> {
        let sheet = self.sheet()?;
        let highest_row = sheet.get_highest_row();
        let highest_column = sheet.get_highest_column();

        let mut tracker = TrackerSheet::default();

        // 第一列是標題，同名欄位以最左邊為準
        for column in 1..=highest_column {
            if let Some(header) = Self::read_cell(sheet, column, 1).and_then(|c| c.value) {
                tracker.headers.entry(header).or_insert(column);
            }
        }

        for row in 2..=highest_row {
            let mut sheet_row = SheetRow::new(row);
            for column in 1..=highest_column {
                if let Some(cell) = Self::read_cell(sheet, column, row) {
                    sheet_row.cells.insert(column, cell);
                }
            }
            tracker.rows.push(sheet_row);
        }

        tracing::debug!(
            "Workbook has {} data rows and {} headers",
            tracker.row_count(),
            tracker.headers.len()
        );
        Ok(tracker)
    }

    fn apply(&mut self, updates: &[CellUpdate]) -> Result<()> {
        let path = self.path.clone();
        let sheet = self
            .book
            .get_sheet_mut(&0)
            .ok_or_else(|| Self::error(&path, "Workbook has no worksheets".to_string()))?;

        for update in updates {
            let cell = sheet.get_cell_mut((update.column(), update.row()));
            match update {
                CellUpdate::Text { value, .. } => {
                    cell.set_value(value.clone());
                }
                CellUpdate::Number { value, .. } => {
                    cell.set_value_number(*value);
                }
                CellUpdate::Link { value, url, .. } => {
                    let mut link = Hyperlink::default();
                    link.set_url(url.clone());
                    cell.set_value(value.clone());
                    cell.set_hyperlink(link);

                    let font = cell.get_style_mut().get_font_mut();
                    font.get_color_mut().set_argb(LINK_COLOR);
                    font.set_underline("single");
                }
            }
        }
        Ok(())
    }

    /// Writes next to the target first and renames over it, so an interrupted
    /// save leaves the previous workbook intact.
    fn save(&mut self) -> Result<()> {
        let temp_path = self.temp_path();
        umya_spreadsheet::writer::xlsx::write(&self.book, &temp_path)
            .map_err(|e| Self::error(&self.path, format!("Failed to write workbook: {}", e)))?;
        std::fs::rename(&temp_path, &self.path)?;

        tracing::debug!("💾 Saved {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
