#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/volcone/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod csv_loader;
pub mod error;

pub use csv_loader::{LoadOptions, load_csv, read_csv};
pub use error::{DataError, Result};
