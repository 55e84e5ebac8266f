//! The boundary trait an output writer implements to consume a populated
//! `Entity` from the pipeline. On-disk serialization is deliberately kept
//! out of the core: this is only the seam, plus a feature-gated reference
//! implementation per output format.

use crate::model::Entity;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error writing entity {entity}: {source}")]
    Io {
        entity: String,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error writing entity {entity}: {message}")]
    Serialization { entity: String, message: String },
}

/// Consumes one fully-generated `Entity` at a time. An outer layer
/// implements this once per output format; the core never depends on a
/// concrete implementation.
pub trait RowSink {
    /// Writes every row of `entity`, in insertion order, with a header row
    /// of attribute names in declaration order.
    fn write_entity(&mut self, entity: &Entity) -> Result<(), SinkError>;
}

#[cfg(feature = "csv-writer")]
pub use csv_sink::CsvRowSink;

/// Reference `RowSink` implementation: one CSV file per entity, named
/// after the last path segment of the entity's external id (the portion
/// after the final `/`). Ships behind the `csv-writer` feature as a
/// worked example/test fixture, not a maintained surface.
#[cfg(feature = "csv-writer")]
mod csv_sink {
    use std::path::{Path, PathBuf};

    use super::SinkError;
    use crate::model::Entity;

    pub struct CsvRowSink {
        output_dir: PathBuf,
    }

    impl CsvRowSink {
        pub fn new(output_dir: impl Into<PathBuf>) -> Self {
            Self {
                output_dir: output_dir.into(),
            }
        }

        /// The file name an entity writes to: the external id's last
        /// `/`-separated segment, suffixed `.csv`. An external id ending in
        /// `/` yields an empty segment.
        fn file_name_for(entity_external_id: &str) -> String {
            let segment = entity_external_id.rsplit('/').next().unwrap_or("");
            format!("{segment}.csv")
        }

        fn path_for(&self, entity_external_id: &str) -> PathBuf {
            self.output_dir.join(Self::file_name_for(entity_external_id))
        }
    }

    impl super::RowSink for CsvRowSink {
        fn write_entity(&mut self, entity: &Entity) -> Result<(), SinkError> {
            let header: Vec<&str> = entity.attributes.iter().map(|a| a.name.as_str()).collect();
            let path: PathBuf = self.path_for(entity.external_id());
            write_csv(&path, &header, entity).map_err(|source| SinkError::Io {
                entity: entity.name().to_string(),
                source,
            })
        }
    }

    fn write_csv(path: &Path, header: &[&str], entity: &Entity) -> std::io::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(header)?;
        for row in entity.rows() {
            let record: Vec<&str> = header.iter().map(|name| row.get(name)).collect();
            writer.write_record(&record)?;
        }
        writer.flush()
    }

}
