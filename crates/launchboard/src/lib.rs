//! `launchboard` - An interactive dashboard for rocket launch outcomes
//!
//! This library loads a table of launch records once, derives success-rate and
//! payload-vs-outcome views from it on demand, and serves them as plotly charts
//! behind a small reactive binding layer.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod binding;
pub mod chart;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod logging;
pub mod server;
pub mod views;

pub use binding::{BindingTable, InputId, InputState, OutputSlot, SlotUpdate};
pub use chart::Figure;
pub use config::Config;
pub use dataset::{Dataset, LaunchRecord, Outcome};
pub use error::{Error, Result};
pub use layout::Layout;
pub use logging::init_logging;
pub use views::{
    compute_outcome_rate_view, compute_scatter_view, OutcomeRateView, PayloadRange, ScatterView,
    SiteFilter,
};
