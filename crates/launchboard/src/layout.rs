//! Dashboard page layout.
//!
//! Describes the fixed vertical layout: heading, site dropdown, pie chart,
//! payload slider, scatter chart. The page fetches this once and builds its
//! controls from it.

use serde::{Deserialize, Serialize};

use crate::binding::{InputId, InputState, OutputSlot};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::views::{PayloadRange, SiteFilter, ALL_SITES};

/// Label of the all-sites dropdown entry.
pub const ALL_SITES_LABEL: &str = "All Sites";

/// Dropdown placeholder text.
pub const SITE_PLACEHOLDER: &str = "Select a location";

/// Label above the payload slider.
pub const SLIDER_LABEL: &str = "Select Payload (Kg):";

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    /// Text shown to the user.
    pub label: String,
    /// Value sent back on selection.
    pub value: String,
}

/// Site selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dropdown {
    /// Input id.
    pub id: InputId,
    /// Entries, `All Sites` first.
    pub options: Vec<DropdownOption>,
    /// Initial selection.
    pub value: SiteFilter,
    /// Placeholder text.
    pub placeholder: String,
}

/// Payload range selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    /// Input id.
    pub id: InputId,
    /// Label shown above the slider.
    pub label: String,
    /// Scale minimum.
    pub min: f64,
    /// Scale maximum.
    pub max: f64,
    /// Step between handle positions.
    pub step: f64,
    /// Initial handle positions.
    pub value: PayloadRange,
}

/// Full page description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Page heading.
    pub title: String,
    /// Site dropdown.
    pub dropdown: Dropdown,
    /// Payload slider.
    pub slider: RangeSlider,
    /// Chart slots in page order.
    pub slots: Vec<OutputSlot>,
}

impl Layout {
    /// Build the layout from configuration and the loaded dataset.
    ///
    /// The slider starts at the dataset's payload extrema so every launch is
    /// visible initially; an empty dataset falls back to the full scale.
    #[must_use]
    pub fn build(config: &DashboardConfig, dataset: &Dataset) -> Self {
        let mut options = vec![DropdownOption {
            label: ALL_SITES_LABEL.to_string(),
            value: ALL_SITES.to_string(),
        }];
        options.extend(config.sites.iter().map(|site| DropdownOption {
            label: site.clone(),
            value: site.clone(),
        }));

        let value = dataset.payload_bounds().map_or(
            PayloadRange::new(config.payload_min, config.payload_max),
            |bounds| PayloadRange::new(bounds.min, bounds.max),
        );

        Self {
            title: config.title.clone(),
            dropdown: Dropdown {
                id: InputId::SiteDropdown,
                options,
                value: SiteFilter::All,
                placeholder: SITE_PLACEHOLDER.to_string(),
            },
            slider: RangeSlider {
                id: InputId::PayloadSlider,
                label: SLIDER_LABEL.to_string(),
                min: config.payload_min,
                max: config.payload_max,
                step: config.payload_step,
                value,
            },
            slots: vec![OutputSlot::SuccessPieGraph, OutputSlot::SuccessScatterGraph],
        }
    }

    /// Input values the page starts with.
    #[must_use]
    pub fn initial_state(&self) -> InputState {
        InputState {
            site: self.dropdown.value.clone(),
            payload: self.slider.value,
        }
    }
}
