#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/volcone/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod estimators;
pub mod overlapping;
pub mod registry;
pub mod rolling;
pub mod selector;
pub mod series;
pub mod synthetic;

pub use config::{CloseReference, EstimatorConfig};
pub use error::{Result, VolatilityError};
pub use estimators::EstimatorFn;
pub use overlapping::{hodges_tompkins_factor, overlapping_adjustment_factor};
pub use registry::{
    EstimatorInfo, available_estimators, estimators_using_only, get_estimator_info,
    list_estimator_names,
};
pub use selector::{Estimator, get_estimator};
pub use series::{Ohlc, PriceSeries, VolatilitySeries};
