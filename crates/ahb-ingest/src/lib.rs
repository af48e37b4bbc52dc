#![deny(unsafe_code)]

pub mod csv;
pub mod discovery;
pub mod error;

pub use crate::csv::{load_pair, read_rows};
pub use discovery::{
    INPUT_DIR_ENV_VAR, MatchedFile, PruefidFile, VersionPair, all_pairs, available_pruefids,
    consecutive_pairs, default_input_root, find_pruefid_file, format_versions, list_csv_files,
    matching_files, message_format_dirs,
};
pub use error::{IngestError, Result};
