//! Derived views over the launch dataset.
//!
//! Both views are pure functions of `(dataset, inputs)`: they allocate a fresh
//! result on every call and never fail. Selections that match nothing produce
//! an empty view, which renders as an empty chart.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Outcome};

/// Sentinel value selecting every launch site.
pub const ALL_SITES: &str = "ALL";

/// Label of the success slice in a single-site view.
pub const SUCCESS_LABEL: &str = "Success";

/// Label of the failure slice in a single-site view.
pub const FAILURE_LABEL: &str = "Failure";

/// Which launch sites a view covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SiteFilter {
    /// Every site.
    #[default]
    All,
    /// A single named site.
    Site(String),
}

impl SiteFilter {
    /// Parse a dropdown value; `ALL` selects every site.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            Self::All
        } else {
            Self::Site(value.to_string())
        }
    }

    /// Check whether a record from `site` passes this filter.
    #[must_use]
    pub fn matches(&self, site: &str) -> bool {
        match self {
            Self::All => true,
            Self::Site(selected) => selected == site,
        }
    }

    /// The dropdown value for this filter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_SITES,
            Self::Site(site) => site,
        }
    }

    /// Check whether this filter selects every site.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl FromStr for SiteFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for SiteFilter {
    fn from(value: String) -> Self {
        if value == ALL_SITES {
            Self::All
        } else {
            Self::Site(value)
        }
    }
}

impl From<SiteFilter> for String {
    fn from(filter: SiteFilter) -> Self {
        match filter {
            SiteFilter::All => ALL_SITES.to_string(),
            SiteFilter::Site(site) => site,
        }
    }
}

impl fmt::Display for SiteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed payload interval `[low, high]` in kg.
///
/// Serialized as a two-element array, the shape a range slider reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PayloadRange {
    /// Inclusive lower bound.
    pub low: f64,
    /// Inclusive upper bound.
    pub high: f64,
}

impl PayloadRange {
    /// Create a range. `low > high` is allowed and matches nothing.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Check whether `mass` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, mass: f64) -> bool {
        self.low <= mass && mass <= self.high
    }

    /// Check whether the bounds are reversed.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.low > self.high
    }
}

impl From<[f64; 2]> for PayloadRange {
    fn from([low, high]: [f64; 2]) -> Self {
        Self { low, high }
    }
}

impl From<PayloadRange> for [f64; 2] {
    fn from(range: PayloadRange) -> Self {
        [range.low, range.high]
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// One category of an outcome-rate view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSlice {
    /// Site name, or `Success`/`Failure` for a single-site view.
    pub label: String,
    /// Share of the whole; the shares of a view sum to 1.
    pub value: f64,
    /// Underlying rate: the site's mean outcome, or the success/failure rate.
    pub rate: f64,
    /// Launches behind this slice.
    pub launches: usize,
}

/// Aggregated success proportions for the pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRateView {
    /// The site selection this view was computed for.
    pub site: SiteFilter,
    /// Ordered slices. Empty when nothing matched.
    pub slices: Vec<RateSlice>,
}

impl OutcomeRateView {
    /// Check whether the view has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Sum of slice values: 1.0 for a non-empty view, 0.0 otherwise.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|slice| slice.value).sum()
    }

    /// Look up a slice by label.
    #[must_use]
    pub fn slice(&self, label: &str) -> Option<&RateSlice> {
        self.slices.iter().find(|slice| slice.label == label)
    }
}

/// One point of the payload-vs-outcome scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Payload mass in kg (x axis).
    pub payload_mass_kg: f64,
    /// Launch outcome (y axis).
    pub outcome: Outcome,
    /// Booster category (colour group).
    pub booster_version_category: String,
}

/// Filtered launches for the scatter chart, in dataset order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterView {
    /// The site selection this view was computed for.
    pub site: SiteFilter,
    /// The payload range this view was computed for.
    pub range: PayloadRange,
    /// Matching launches in dataset order.
    pub points: Vec<ScatterPoint>,
}

impl ScatterView {
    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether no launch matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Booster categories present, in first-appearance order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for point in &self.points {
            let category = point.booster_version_category.as_str();
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator as f64
}

/// Compute success proportions for the selected site(s).
///
/// For [`SiteFilter::All`] there is one slice per distinct site, in lexical
/// order, carrying the site's mean outcome as `rate` and its share of the
/// summed rates as `value`. When every site's rate is zero the shares are
/// uniform. For a single site the view is a `Success`/`Failure` split. A site
/// with no records yields an empty view.
#[must_use]
pub fn compute_outcome_rate_view(dataset: &Dataset, site: &SiteFilter) -> OutcomeRateView {
    let slices = match site {
        SiteFilter::All => per_site_slices(dataset),
        SiteFilter::Site(name) => single_site_slices(dataset, name),
    };

    OutcomeRateView {
        site: site.clone(),
        slices,
    }
}

fn per_site_slices(dataset: &Dataset) -> Vec<RateSlice> {
    // site -> (successes, launches)
    let mut tallies: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in dataset.records() {
        let tally = tallies.entry(record.launch_site.as_str()).or_default();
        if record.outcome.is_success() {
            tally.0 += 1;
        }
        tally.1 += 1;
    }

    let rates: Vec<(&str, f64, usize)> = tallies
        .into_iter()
        .map(|(site, (successes, launches))| (site, ratio(successes, launches), launches))
        .collect();
    let total: f64 = rates.iter().map(|(_, rate, _)| rate).sum();
    let count = rates.len();

    rates
        .into_iter()
        .map(|(site, rate, launches)| RateSlice {
            label: site.to_string(),
            value: if total > 0.0 {
                rate / total
            } else {
                ratio(1, count)
            },
            rate,
            launches,
        })
        .collect()
}

fn single_site_slices(dataset: &Dataset, site: &str) -> Vec<RateSlice> {
    let (successes, launches) = dataset
        .records()
        .iter()
        .filter(|record| record.launch_site == site)
        .fold((0_usize, 0_usize), |(successes, launches), record| {
            (
                successes + usize::from(record.outcome.is_success()),
                launches + 1,
            )
        });

    if launches == 0 {
        return Vec::new();
    }

    let success_rate = ratio(successes, launches);
    let failure_rate = 1.0 - success_rate;
    vec![
        RateSlice {
            label: SUCCESS_LABEL.to_string(),
            value: success_rate,
            rate: success_rate,
            launches: successes,
        },
        RateSlice {
            label: FAILURE_LABEL.to_string(),
            value: failure_rate,
            rate: failure_rate,
            launches: launches - successes,
        },
    ]
}

/// Select launches for the scatter chart.
///
/// Keeps records matching `site` whose payload lies in `range` (both bounds
/// inclusive), in dataset order. An inverted range matches nothing.
#[must_use]
pub fn compute_scatter_view(
    dataset: &Dataset,
    site: &SiteFilter,
    range: PayloadRange,
) -> ScatterView {
    let points = dataset
        .records()
        .iter()
        .filter(|record| {
            site.matches(&record.launch_site) && range.contains(record.payload_mass_kg)
        })
        .map(|record| ScatterPoint {
            payload_mass_kg: record.payload_mass_kg,
            outcome: record.outcome,
            booster_version_category: record.booster_version_category.clone(),
        })
        .collect();

    ScatterView {
        site: site.clone(),
        range,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LaunchRecord;

    const TOLERANCE: f64 = 1e-9;

    fn record(site: &str, mass: f64, category: &str, success: bool) -> LaunchRecord {
        let outcome = if success {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        LaunchRecord::new(site, mass, category, outcome)
    }

    fn launches() -> Dataset {
        Dataset::new(
            vec![
                record("CCAFS LC-40", 500.0, "v1.0", true),
                record("VAFB SLC-4E", 9600.0, "FT", true),
                record("CCAFS LC-40", 1500.0, "v1.1", false),
                record("KSC LC-39A", 3000.0, "FT", true),
                record("CCAFS LC-40", 3000.0, "FT", true),
                record("VAFB SLC-4E", 500.0, "v1.1", false),
                record("CCAFS LC-40", 9000.0, "B5", true),
                record("CCAFS SLC-40", 5000.0, "B4", false),
                record("KSC LC-39A", 1000.0, "B4", true),
            ],
            "test",
        )
    }

    fn all_selections(dataset: &Dataset) -> Vec<SiteFilter> {
        let mut selections = vec![SiteFilter::All];
        selections.extend(
            dataset
                .sites()
                .into_iter()
                .map(|site| SiteFilter::Site(site.to_string())),
        );
        selections
    }

    #[test]
    fn test_site_filter_parse() {
        assert_eq!(SiteFilter::parse("ALL"), SiteFilter::All);
        assert_eq!(
            SiteFilter::parse("KSC LC-39A"),
            SiteFilter::Site("KSC LC-39A".to_string())
        );
        assert_eq!("ALL".parse::<SiteFilter>().unwrap(), SiteFilter::All);
        assert_eq!(SiteFilter::All.to_string(), "ALL");
    }

    #[test]
    fn test_site_filter_serde() {
        let json = serde_json::to_string(&SiteFilter::Site("VAFB SLC-4E".to_string())).unwrap();
        assert_eq!(json, "\"VAFB SLC-4E\"");
        let parsed: SiteFilter = serde_json::from_str("\"ALL\"").unwrap();
        assert!(parsed.is_all());
    }

    #[test]
    fn test_payload_range_serde_as_pair() {
        let range: PayloadRange = serde_json::from_str("[1000, 5000]").unwrap();
        assert_eq!(range, PayloadRange::new(1000.0, 5000.0));
        assert_eq!(serde_json::to_string(&range).unwrap(), "[1000.0,5000.0]");
    }

    #[test]
    fn test_payload_range_contains_inclusive() {
        let range = PayloadRange::new(1000.0, 5000.0);
        assert!(range.contains(1000.0));
        assert!(range.contains(5000.0));
        assert!(!range.contains(999.9));
        assert!(!range.contains(5000.1));
        assert!(PayloadRange::new(2.0, 1.0).is_inverted());
    }

    #[test]
    fn test_single_site_rates() {
        let dataset = Dataset::new(
            vec![
                record("CCAFS LC-40", 100.0, "FT", true),
                record("CCAFS LC-40", 200.0, "FT", false),
                record("CCAFS LC-40", 300.0, "FT", true),
                record("CCAFS LC-40", 400.0, "FT", true),
            ],
            "test",
        );
        let view =
            compute_outcome_rate_view(&dataset, &SiteFilter::Site("CCAFS LC-40".to_string()));

        let labels: Vec<&str> = view.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Success", "Failure"]);
        assert!((view.slice("Success").unwrap().value - 0.75).abs() < TOLERANCE);
        assert!((view.slice("Failure").unwrap().value - 0.25).abs() < TOLERANCE);
        assert_eq!(view.slice("Success").unwrap().launches, 3);
        assert_eq!(view.slice("Failure").unwrap().launches, 1);
    }

    #[test]
    fn test_all_sites_one_slice_per_site_in_lexical_order() {
        let dataset = launches();
        let view = compute_outcome_rate_view(&dataset, &SiteFilter::All);

        let labels: Vec<&str> = view.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, dataset.sites());
        assert_eq!(view.slices.len(), 4);
    }

    #[test]
    fn test_all_sites_rates_are_site_means() {
        let view = compute_outcome_rate_view(&launches(), &SiteFilter::All);

        let ccafs = view.slice("CCAFS LC-40").unwrap();
        assert!((ccafs.rate - 0.75).abs() < TOLERANCE);
        assert_eq!(ccafs.launches, 4);

        let slc = view.slice("CCAFS SLC-40").unwrap();
        assert!(slc.rate.abs() < TOLERANCE);
        assert!(slc.value.abs() < TOLERANCE);

        // 0.75 + 0 + 1 + 0.5
        let ksc = view.slice("KSC LC-39A").unwrap();
        assert!((ksc.value - 1.0 / 2.25).abs() < TOLERANCE);
    }

    #[test]
    fn test_rate_values_sum_to_one() {
        let dataset = launches();
        for selection in all_selections(&dataset) {
            let view = compute_outcome_rate_view(&dataset, &selection);
            assert!(!view.is_empty(), "{selection} should have data");
            assert!(
                (view.total() - 1.0).abs() < TOLERANCE,
                "{selection} sums to {}",
                view.total()
            );
        }
    }

    #[test]
    fn test_all_failures_gives_uniform_shares() {
        let dataset = Dataset::new(
            vec![
                record("CCAFS LC-40", 100.0, "v1.0", false),
                record("VAFB SLC-4E", 200.0, "v1.1", false),
            ],
            "test",
        );
        let view = compute_outcome_rate_view(&dataset, &SiteFilter::All);
        assert_eq!(view.slices.len(), 2);
        assert!((view.total() - 1.0).abs() < TOLERANCE);
        assert!(view.slices.iter().all(|slice| slice.rate.abs() < TOLERANCE));
    }

    #[test]
    fn test_unknown_site_is_empty() {
        let dataset = launches();
        let site = SiteFilter::Site("Boca Chica".to_string());

        let rates = compute_outcome_rate_view(&dataset, &site);
        assert!(rates.is_empty());
        assert!(rates.total().abs() < TOLERANCE);

        let scatter = compute_scatter_view(&dataset, &site, PayloadRange::new(0.0, 10_000.0));
        assert!(scatter.is_empty());
    }

    #[test]
    fn test_empty_dataset_views() {
        let dataset = Dataset::new(Vec::new(), "empty");
        assert!(compute_outcome_rate_view(&dataset, &SiteFilter::All).is_empty());
        assert!(
            compute_scatter_view(&dataset, &SiteFilter::All, PayloadRange::new(0.0, 1.0))
                .is_empty()
        );
    }

    #[test]
    fn test_scatter_range_scenario() {
        let dataset = Dataset::new(
            vec![
                record("CCAFS LC-40", 500.0, "v1.0", true),
                record("CCAFS LC-40", 1500.0, "v1.1", false),
                record("CCAFS LC-40", 3000.0, "FT", true),
                record("CCAFS LC-40", 9000.0, "B5", true),
            ],
            "test",
        );
        let view = compute_scatter_view(
            &dataset,
            &SiteFilter::All,
            PayloadRange::new(1000.0, 5000.0),
        );

        let masses: Vec<f64> = view.points.iter().map(|p| p.payload_mass_kg).collect();
        assert_eq!(masses, vec![1500.0, 3000.0]);
    }

    #[test]
    fn test_scatter_points_within_range() {
        let dataset = launches();
        let ranges = [
            PayloadRange::new(0.0, 10_000.0),
            PayloadRange::new(500.0, 500.0),
            PayloadRange::new(1000.0, 3000.0),
            PayloadRange::new(4000.0, 9600.0),
        ];
        for selection in all_selections(&dataset) {
            for range in ranges {
                let view = compute_scatter_view(&dataset, &selection, range);
                for point in &view.points {
                    assert!(range.low <= point.payload_mass_kg);
                    assert!(point.payload_mass_kg <= range.high);
                }
            }
        }
    }

    #[test]
    fn test_scatter_inclusive_bounds() {
        let view = compute_scatter_view(
            &launches(),
            &SiteFilter::All,
            PayloadRange::new(500.0, 3000.0),
        );
        let masses: Vec<f64> = view.points.iter().map(|p| p.payload_mass_kg).collect();
        assert_eq!(masses, vec![500.0, 1500.0, 3000.0, 3000.0, 500.0, 1000.0]);
    }

    #[test]
    fn test_scatter_inverted_range_is_empty() {
        let dataset = launches();
        for selection in all_selections(&dataset) {
            let view = compute_scatter_view(&dataset, &selection, PayloadRange::new(5000.0, 1000.0));
            assert!(view.is_empty());
        }
    }

    #[test]
    fn test_scatter_single_site_preserves_order() {
        let view = compute_scatter_view(
            &launches(),
            &SiteFilter::Site("CCAFS LC-40".to_string()),
            PayloadRange::new(0.0, 10_000.0),
        );
        let masses: Vec<f64> = view.points.iter().map(|p| p.payload_mass_kg).collect();
        assert_eq!(masses, vec![500.0, 1500.0, 3000.0, 9000.0]);
        assert_eq!(view.categories(), vec!["v1.0", "v1.1", "FT", "B5"]);
    }

    #[test]
    fn test_views_are_idempotent() {
        let dataset = launches();
        let range = PayloadRange::new(1000.0, 9000.0);
        for selection in all_selections(&dataset) {
            assert_eq!(
                compute_outcome_rate_view(&dataset, &selection),
                compute_outcome_rate_view(&dataset, &selection)
            );
            assert_eq!(
                compute_scatter_view(&dataset, &selection, range),
                compute_scatter_view(&dataset, &selection, range)
            );
        }
    }
}
