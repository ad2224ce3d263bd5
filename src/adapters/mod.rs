// Adapters layer: concrete implementations for external systems (files, tables).

pub mod csv_source;
pub mod storage;
