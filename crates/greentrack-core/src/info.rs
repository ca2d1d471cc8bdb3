//! Interactive state of an informational page.
//!
//! Most of a page is static content. The sustainable-future page adds a
//! year slider over its timeline, expandable benefits, and a carbon
//! footprint calculator; this module holds that state.

use std::str::FromStr;

use greentrack_types::{InfoPage, PageId, TimelineMetrics};
use rust_decimal::Decimal;
use tracing::debug;

/// Tonnes of CO₂ per kWh used by the footprint calculator.
pub const TONNES_CO2_PER_KWH: Decimal = Decimal::from_parts(5, 0, 0, false, 4);

/// Decimal places shown for a footprint result.
const FOOTPRINT_DP: u32 = 2;

/// Estimated yearly footprint in tonnes of CO₂ for `input` kWh.
///
/// Returns `None` for input that is empty, not a number, or negative.
pub fn calculate_footprint(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    let kwh = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()?;
    if kwh.is_sign_negative() && !kwh.is_zero() {
        return None;
    }
    kwh.checked_mul(TONNES_CO2_PER_KWH)
        .map(|tonnes| tonnes.round_dp(FOOTPRINT_DP))
}

/// Improvement figures for one year of the timeline, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearReading {
    /// The year being shown.
    pub year: i32,
    /// Efficiency gain.
    pub efficiency_gain: Decimal,
    /// Emissions reduction against the baseline.
    pub emissions_reduction: Decimal,
    /// Waste reduction against the baseline.
    pub waste_reduction: Decimal,
}

/// State of the page currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPageState {
    page: InfoPage,
    selected_year: Option<i32>,
    expanded_benefit: Option<u32>,
    footprint: Option<Decimal>,
}

impl InfoPageState {
    /// Open `page` with the slider on the latest year and nothing expanded.
    pub fn new(page: InfoPage) -> Self {
        let selected_year = page.timeline.last().map(|m| m.year);
        Self {
            page,
            selected_year,
            expanded_benefit: None,
            footprint: None,
        }
    }

    /// Which page this is.
    pub const fn id(&self) -> PageId {
        self.page.id
    }

    /// The page content.
    pub const fn page(&self) -> &InfoPage {
        &self.page
    }

    /// Year the slider points at, if the page has a timeline.
    pub const fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    /// Benefit currently expanded.
    pub const fn expanded_benefit(&self) -> Option<u32> {
        self.expanded_benefit
    }

    /// Last calculated footprint in tonnes of CO₂.
    pub const fn footprint(&self) -> Option<Decimal> {
        self.footprint
    }

    /// Move the slider, clamping to the years the timeline covers.
    ///
    /// Returns the year actually selected, or `None` if the page has no
    /// timeline.
    pub fn select_year(&mut self, year: i32) -> Option<i32> {
        let first = self.page.timeline.first()?.year;
        let last = self.page.timeline.last()?.year;
        let clamped = year.clamp(first, last);
        self.selected_year = Some(clamped);
        debug!(requested = year, selected = clamped, "Timeline year selected");
        Some(clamped)
    }

    /// Metrics recorded for `year`, or all zeros if the year has no entry.
    pub fn metrics_for(&self, year: i32) -> TimelineMetrics {
        self.page
            .timeline
            .iter()
            .find(|m| m.year == year)
            .cloned()
            .unwrap_or_else(|| TimelineMetrics {
                year,
                efficiency: Decimal::ZERO,
                emissions: Decimal::ZERO,
                waste: Decimal::ZERO,
            })
    }

    /// The improvement figures for the selected year.
    pub fn reading(&self) -> Option<YearReading> {
        let year = self.selected_year?;
        let metrics = self.metrics_for(year);
        Some(YearReading {
            year,
            efficiency_gain: metrics.efficiency,
            emissions_reduction: Decimal::ONE_HUNDRED.saturating_sub(metrics.emissions),
            waste_reduction: Decimal::ONE_HUNDRED.saturating_sub(metrics.waste),
        })
    }

    /// Expand benefit `id`, or collapse it if it is already expanded.
    ///
    /// Returns `false` if the page has no benefit with that id.
    pub fn toggle_benefit(&mut self, id: u32) -> bool {
        if !self.page.benefits.iter().any(|b| b.id == id) {
            debug!(id, "Unknown benefit");
            return false;
        }
        self.expanded_benefit = if self.expanded_benefit == Some(id) {
            None
        } else {
            Some(id)
        };
        true
    }

    /// Run the footprint calculator on `input` kWh and keep the result.
    ///
    /// Invalid input clears any previous result. Pages without the
    /// calculator ignore the call and return `None`.
    pub fn calculate_footprint(&mut self, input: &str) -> Option<Decimal> {
        if !self.page.footprint_calculator {
            return None;
        }
        self.footprint = calculate_footprint(input);
        debug!(input, result = ?self.footprint, "Footprint calculated");
        self.footprint
    }
}

#[cfg(test)]
mod tests {
    use greentrack_types::Benefit;

    use super::*;

    fn metrics(year: i32, efficiency: i64, emissions: i64, waste: i64) -> TimelineMetrics {
        TimelineMetrics {
            year,
            efficiency: Decimal::new(efficiency, 0),
            emissions: Decimal::new(emissions, 0),
            waste: Decimal::new(waste, 0),
        }
    }

    fn page() -> InfoPage {
        InfoPage {
            id: PageId::SustainableFuture,
            title: "AI for a Sustainable Future".to_owned(),
            intro: String::new(),
            statistics: Vec::new(),
            case_studies: Vec::new(),
            figures: Vec::new(),
            strategies: Vec::new(),
            benefits: vec![
                Benefit {
                    id: 1,
                    title: "Supply Chain Optimization".to_owned(),
                    description: String::new(),
                    details: Vec::new(),
                },
                Benefit {
                    id: 2,
                    title: "Reduced Production Waste".to_owned(),
                    description: String::new(),
                    details: Vec::new(),
                },
            ],
            timeline: vec![
                metrics(2020, 20, 100, 80),
                metrics(2022, 55, 65, 55),
                metrics(2024, 90, 25, 15),
            ],
            projection: Vec::new(),
            projection_caption: String::new(),
            footprint_calculator: true,
        }
    }

    #[test]
    fn footprint_is_exact_to_two_places() {
        assert_eq!(calculate_footprint("1000"), Some(Decimal::new(50, 2)));
        assert_eq!(calculate_footprint(" 12345 "), Some(Decimal::new(617, 2)));
        assert_eq!(calculate_footprint("0"), Some(Decimal::ZERO));
        assert_eq!(calculate_footprint("1e4"), Some(Decimal::new(500, 2)));
    }

    #[test]
    fn invalid_footprint_input_is_none() {
        assert_eq!(calculate_footprint(""), None);
        assert_eq!(calculate_footprint("lots"), None);
        assert_eq!(calculate_footprint("-5"), None);
    }

    #[test]
    fn slider_starts_on_latest_year_and_clamps() {
        let mut state = InfoPageState::new(page());
        assert_eq!(state.selected_year(), Some(2024));
        assert_eq!(state.select_year(1999), Some(2020));
        assert_eq!(state.select_year(2031), Some(2024));
    }

    #[test]
    fn reading_inverts_emissions_and_waste() {
        let mut state = InfoPageState::new(page());
        let _ = state.select_year(2022);
        let reading = state.reading();
        assert_eq!(reading.map(|r| r.efficiency_gain), Some(Decimal::new(55, 0)));
        assert_eq!(reading.map(|r| r.emissions_reduction), Some(Decimal::new(35, 0)));
        assert_eq!(reading.map(|r| r.waste_reduction), Some(Decimal::new(45, 0)));
    }

    #[test]
    fn year_without_entry_reads_as_zero_metrics() {
        let mut state = InfoPageState::new(page());
        let _ = state.select_year(2021);
        let reading = state.reading();
        assert_eq!(reading.map(|r| r.efficiency_gain), Some(Decimal::ZERO));
        assert_eq!(reading.map(|r| r.emissions_reduction), Some(Decimal::ONE_HUNDRED));
    }

    #[test]
    fn benefits_toggle_one_at_a_time() {
        let mut state = InfoPageState::new(page());
        assert!(state.toggle_benefit(1));
        assert_eq!(state.expanded_benefit(), Some(1));
        assert!(state.toggle_benefit(2));
        assert_eq!(state.expanded_benefit(), Some(2));
        assert!(state.toggle_benefit(2));
        assert_eq!(state.expanded_benefit(), None);
        assert!(!state.toggle_benefit(9));
    }

    #[test]
    fn bad_input_clears_previous_result() {
        let mut state = InfoPageState::new(page());
        assert!(state.calculate_footprint("2000").is_some());
        assert_eq!(state.calculate_footprint("abc"), None);
        assert_eq!(state.footprint(), None);
    }

    #[test]
    fn page_without_timeline_has_no_slider() {
        let mut bare = page();
        bare.timeline.clear();
        bare.footprint_calculator = false;
        let mut state = InfoPageState::new(bare);
        assert_eq!(state.select_year(2022), None);
        assert!(state.reading().is_none());
        assert!(state.calculate_footprint("100").is_none());
    }
}
