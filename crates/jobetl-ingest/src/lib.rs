//! Reading job-posting sources and their column mappings.

pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod lineage;
pub mod mapping;

pub use csv_table::{CsvTable, read_csv_table};
pub use discovery::{
    MAPPING_SUFFIX, MAPPINGS_DIR, SourceFile, discover_sources, list_csv_files, source_from_path,
};
pub use error::{IngestError, Result};
pub use lineage::derive_record_id;
pub use mapping::{MappingConfig, MappingEntry, read_mapping_config};
