//! I/O layer: MTL metadata sidecar discovery/parsing and the contracts
//! of the external GIS collaborators.
pub mod gis;
pub mod metadata;

pub use gis::{
    DirectoryLister, ExistenceChecker, FsDirectoryLister, GisError, ImportRequest, LoggingGis,
    RasterImporter, RecordingGis, TimestampSetter,
};
pub use metadata::{
    AcquisitionTimestamp, MetadataError, find_metadata_file, parse_manual_timestamp,
    read_timestamp,
};
