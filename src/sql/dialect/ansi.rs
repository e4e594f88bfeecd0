//! ANSI SQL dialect.
//!
//! The reference profile: standard syntax for everything, every standard
//! capability switched on and no emulation rules. Useful as a baseline and
//! for engines that follow the standard closely.

use super::{Feature, IntervalStyle, Pagination, SqlDialect, Version};

/// Standard SQL.
#[derive(Debug, Clone, Copy)]
pub struct Ansi;

impl SqlDialect for Ansi {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn interval_style(&self) -> IntervalStyle {
        IntervalStyle::Standard
    }

    fn pagination(&self) -> Pagination {
        Pagination::OffsetFetch
    }

    fn supports(&self, feature: Feature, _version: Option<Version>) -> bool {
        !matches!(
            feature,
            Feature::IfFunction | Feature::WithRollup | Feature::WithCube
        )
    }
}
