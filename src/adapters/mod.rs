// Adapters layer: concrete implementations of the domain ports (browser, storage, workbook)

pub mod browser;
pub mod storage;
pub mod workbook;

pub use storage::LocalStorage;
pub use workbook::XlsxWorkbook;
