//! Every figure the site publishes.

use crate::anchored::AnchoredRatio;
use crate::composition::ActiveComposition;
use crate::growth::CaseGrowth;
use crate::kpi::RegionalKpi;
use crate::national::NationalTrend;
use crate::saturation::IcuSaturation;
use crate::testing::{TestsPerCase, TestsVsCases, TestsVsHospitals};
use crate::traits::Figure;

/// All figures, in publishing order.
pub fn catalogue() -> Vec<Box<dyn Figure>> {
    vec![
        Box::new(CaseGrowth::by_date()),
        Box::new(CaseGrowth::by_epidemic_age()),
        Box::new(NationalTrend),
        Box::new(IcuSaturation),
        Box::new(AnchoredRatio::hospitalized()),
        Box::new(AnchoredRatio::intensive_care()),
        Box::new(AnchoredRatio::tested()),
        Box::new(RegionalKpi::tests_per_thousand()),
        Box::new(ActiveComposition::counts()),
        Box::new(ActiveComposition::shares()),
        Box::new(RegionalKpi::positives_per_thousand()),
        Box::new(TestsVsHospitals),
        Box::new(TestsVsCases),
        Box::new(TestsPerCase),
    ]
}

/// The figure called `name`.
pub fn find(name: &str) -> Option<Box<dyn Figure>> {
    catalogue().into_iter().find(|figure| figure.name() == name)
}
