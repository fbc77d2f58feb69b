use serde::Serialize;

use crate::constants::IMAGE_UNITS;

/// Direction in which a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricOptimum {
    HigherIsBetter,
    LowerIsBetter,
}

impl MetricOptimum {
    /// Returns `true` if `v1` beats `v2`. A NaN never beats anything and loses to any number.
    pub fn is_better_than(self, v1: f64, v2: f64) -> bool {
        if v2.is_nan() {
            return true;
        }
        if v1.is_nan() {
            return false;
        }
        match self {
            MetricOptimum::HigherIsBetter => v1 > v2,
            MetricOptimum::LowerIsBetter => v1 < v2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricBound {
    ZeroToOne,
    Unbounded,
}

/// One column of a tracking-metrics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricValue {
    pub key: &'static str,
    pub description: &'static str,
    pub optimum: MetricOptimum,
    pub bound: MetricBound,
}

const fn score(key: &'static str, description: &'static str) -> MetricValue {
    MetricValue {
        key,
        description,
        optimum: MetricOptimum::HigherIsBetter,
        bound: MetricBound::ZeroToOne,
    }
}

const fn cost(key: &'static str, description: &'static str) -> MetricValue {
    MetricValue {
        key,
        description,
        optimum: MetricOptimum::LowerIsBetter,
        bound: MetricBound::Unbounded,
    }
}

pub const SPT_METRICS: [MetricValue; 5] = [
    score("alpha", "Matching score against ground-truth"),
    score(
        "beta",
        "Matching score against ground-truth, penalizing spurious tracks",
    ),
    score("JSC", "Jaccard similarity coefficient for track points"),
    score("JSCtheta", "Jaccard similarity coefficient for whole tracks"),
    cost("RMSE", "Overall localization accuracy"),
];

pub const CTC_METRICS: [MetricValue; 7] = [
    score("SEG", "Segmentation accuracy"),
    score("TRA", "Tracking accuracy"),
    score("DET", "Detection quality"),
    score("CT", "Complete tracks"),
    score("TF", "Track fractions"),
    score("CCA", "Cell-cycle accuracy"),
    score("BC", "Branching correctness"),
];

/// Timing columns appended to every family.
pub const COMMON_METRICS: [MetricValue; 3] = [
    cost("TIM", "Execution time"),
    cost("DETECTION_TIME", "Detection time"),
    cost("TRACKING_TIME", "Tracking time"),
];

/// Tracking-metrics family handed to the runner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum MetricsDescriptor {
    /// Single-particle tracking challenge metrics.
    Spt {
        /// Distance below which a detection and a ground-truth point may be paired.
        max_linking_distance: f64,
        units: String,
    },
    /// Cell tracking challenge metrics.
    Ctc,
}

impl MetricsDescriptor {
    pub fn spt(max_linking_distance: f64) -> Self {
        MetricsDescriptor::Spt {
            max_linking_distance,
            units: IMAGE_UNITS.to_string(),
        }
    }

    pub fn ctc() -> Self {
        MetricsDescriptor::Ctc
    }

    /// Short family tag, as written in task files.
    pub fn tag(&self) -> &'static str {
        match self {
            MetricsDescriptor::Spt { .. } => "SPT",
            MetricsDescriptor::Ctc => "CTC",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricsDescriptor::Spt { .. } => "Single-Particle Tracking (SPT) Challenge metrics",
            MetricsDescriptor::Ctc => "Cell-Tracking challenge (CTC) metrics",
        }
    }

    /// Suffix of the CSV result files written for this family.
    pub fn csv_suffix(&self) -> &'static str {
        match self {
            MetricsDescriptor::Spt { .. } => "SPTMetrics",
            MetricsDescriptor::Ctc => "CTCMetrics",
        }
    }

    /// Publication describing the metrics.
    pub fn url(&self) -> &'static str {
        match self {
            MetricsDescriptor::Spt { .. } => "https://doi.org/10.1038/nmeth.2808",
            MetricsDescriptor::Ctc => "https://doi.org/10.1038/nmeth.4473",
        }
    }

    /// Ordered metric columns: the family's own, then the timing columns.
    pub fn metrics(&self) -> Vec<MetricValue> {
        let own: &[MetricValue] = match self {
            MetricsDescriptor::Spt { .. } => &SPT_METRICS,
            MetricsDescriptor::Ctc => &CTC_METRICS,
        };
        own.iter().chain(COMMON_METRICS.iter()).copied().collect()
    }

    pub fn default_metric(&self) -> MetricValue {
        match self {
            MetricsDescriptor::Spt { .. } => SPT_METRICS[0],
            MetricsDescriptor::Ctc => CTC_METRICS[2],
        }
    }
}
