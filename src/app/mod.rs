// Application layer: the two jobs run against the tracker workbook.

pub mod pipelines;
