//! Plotly figures for the dashboard charts.
//!
//! Derived views are turned into plotly.js figure JSON here. The page hands
//! each [`Figure`] straight to `Plotly.react`, so field names follow plotly's
//! schema rather than Rust conventions.

use serde::{Deserialize, Serialize};

use crate::views::{OutcomeRateView, ScatterView, SiteFilter, FAILURE_LABEL, SUCCESS_LABEL};

/// Pie colours for the all-sites view, cycled when there are more sites.
pub const SITE_COLORS: [&str; 4] = ["gold", "red", "blue", "pink"];

/// Pie colour for successful launches.
pub const SUCCESS_COLOR: &str = "blue";

/// Pie colour for failed launches.
pub const FAILURE_COLOR: &str = "red";

/// Plotly's default qualitative palette, used for booster categories.
pub const CATEGORY_COLORS: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Title of the all-sites pie.
pub const ALL_SITES_PIE_TITLE: &str = "Success Rate of Launch Sites";

/// X axis title of the scatter chart.
pub const PAYLOAD_AXIS_TITLE: &str = "Payload Mass (kg)";

/// Y axis title of the scatter chart.
pub const OUTCOME_AXIS_TITLE: &str = "Launch Outcome";

/// Legend title of the scatter chart.
pub const CATEGORY_LEGEND_TITLE: &str = "Booster Version Category";

/// A complete plotly figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Traces to draw.
    pub data: Vec<Trace>,
    /// Figure layout.
    pub layout: FigureLayout,
}

/// A plotly trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    /// Proportion chart.
    Pie(PieTrace),
    /// Marker scatter.
    Scatter(ScatterTrace),
}

/// Pie trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieTrace {
    /// Slice labels.
    pub labels: Vec<String>,
    /// Slice values.
    pub values: Vec<f64>,
    /// Launch counts shown on hover.
    pub customdata: Vec<usize>,
    /// Hover format.
    pub hovertemplate: String,
    /// Keep slices in view order instead of sorting by size.
    pub sort: bool,
    /// Slice colours.
    pub marker: PieMarker,
}

/// Pie slice colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieMarker {
    /// One colour per slice.
    pub colors: Vec<String>,
}

/// Scatter trace for one booster category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    /// Legend entry, the booster category.
    pub name: String,
    /// Legend group, the booster category.
    pub legendgroup: String,
    /// Always `markers`.
    pub mode: String,
    /// Payload masses.
    pub x: Vec<f64>,
    /// Outcomes, 0 or 1.
    pub y: Vec<u8>,
    /// Marker colour.
    pub marker: ScatterMarker,
}

/// Scatter marker style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterMarker {
    /// Marker colour.
    pub color: String,
}

/// Text wrapper plotly uses for titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Title text.
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// An axis with a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    /// Axis title.
    pub title: Title,
}

/// Legend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    /// Legend title.
    pub title: Title,
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureLayout {
    /// Figure title.
    pub title: Title,
    /// X axis, scatter only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    /// Y axis, scatter only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    /// Legend, scatter only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

impl Figure {
    /// Total number of plotted values across traces.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.data
            .iter()
            .map(|trace| match trace {
                Trace::Pie(pie) => pie.values.len(),
                Trace::Scatter(scatter) => scatter.x.len(),
            })
            .sum()
    }

    /// The figure title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.layout.title.text
    }
}

/// Build the pie figure for an outcome-rate view.
#[must_use]
pub fn outcome_rate_figure(view: &OutcomeRateView) -> Figure {
    let title = match &view.site {
        SiteFilter::All => ALL_SITES_PIE_TITLE.to_string(),
        SiteFilter::Site(site) if view.is_empty() => format!("No launches recorded for {site}"),
        SiteFilter::Site(site) => format!("Success vs. Failure for {site}"),
    };

    let colors = view
        .slices
        .iter()
        .enumerate()
        .map(|(index, slice)| match (&view.site, slice.label.as_str()) {
            (SiteFilter::Site(_), SUCCESS_LABEL) => SUCCESS_COLOR.to_string(),
            (SiteFilter::Site(_), FAILURE_LABEL) => FAILURE_COLOR.to_string(),
            _ => SITE_COLORS[index % SITE_COLORS.len()].to_string(),
        })
        .collect();

    let pie = PieTrace {
        labels: view.slices.iter().map(|slice| slice.label.clone()).collect(),
        values: view.slices.iter().map(|slice| slice.value).collect(),
        customdata: view.slices.iter().map(|slice| slice.launches).collect(),
        hovertemplate: "%{label}: %{percent} (%{customdata} launches)<extra></extra>".to_string(),
        sort: false,
        marker: PieMarker { colors },
    };

    Figure {
        data: vec![Trace::Pie(pie)],
        layout: FigureLayout {
            title: Title::new(title),
            xaxis: None,
            yaxis: None,
            legend: None,
        },
    }
}

/// Build the scatter figure for a scatter view, one trace per booster category.
#[must_use]
pub fn scatter_figure(view: &ScatterView) -> Figure {
    let scope = match &view.site {
        SiteFilter::All => "All Sites",
        SiteFilter::Site(site) => site.as_str(),
    };

    let data = view
        .categories()
        .into_iter()
        .enumerate()
        .map(|(index, category)| {
            let (x, y) = view
                .points
                .iter()
                .filter(|point| point.booster_version_category == category)
                .map(|point| (point.payload_mass_kg, u8::from(point.outcome)))
                .unzip();
            Trace::Scatter(ScatterTrace {
                name: category.to_string(),
                legendgroup: category.to_string(),
                mode: "markers".to_string(),
                x,
                y,
                marker: ScatterMarker {
                    color: CATEGORY_COLORS[index % CATEGORY_COLORS.len()].to_string(),
                },
            })
        })
        .collect();

    Figure {
        data,
        layout: FigureLayout {
            title: Title::new(format!("Payload Mass vs. Launch Outcome for {scope}")),
            xaxis: Some(Axis {
                title: Title::new(PAYLOAD_AXIS_TITLE),
            }),
            yaxis: Some(Axis {
                title: Title::new(OUTCOME_AXIS_TITLE),
            }),
            legend: Some(Legend {
                title: Title::new(CATEGORY_LEGEND_TITLE),
            }),
        },
    }
}
