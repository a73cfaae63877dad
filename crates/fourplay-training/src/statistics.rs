//! Population summaries for progress reports.

use fourplay_evaluator::weights::WeightKind;
use serde::Serialize;

use crate::genetic::Genome;

/// Minimum, maximum and mean of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl Summary {
    /// Summarizes `values`, or returns `None` for an empty sample.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fourplay_training::statistics::Summary;
    /// let summary = Summary::new([2.0, 4.0, 0.0]).unwrap();
    /// assert_eq!(summary.min, 0.0);
    /// assert_eq!(summary.max, 4.0);
    /// assert_eq!(summary.mean, 2.0);
    /// assert!(Summary::new([]).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut count = 0_u32;
        let mut sum = 0.0_f64;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for value in values {
            count += 1;
            sum += f64::from(value);
            min = min.min(value);
            max = max.max(value);
        }
        if count == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let mean = (sum / f64::from(count)) as f32;
        Some(Self { min, max, mean })
    }
}

/// Score and per-trait summaries of one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationStats {
    pub score: Summary,
    pub traits: Vec<(WeightKind, Summary)>,
}

impl PopulationStats {
    /// Summarizes `genomes`, or returns `None` if there are none.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(genomes: &[Genome]) -> Option<Self> {
        let score = Summary::new(genomes.iter().map(Genome::score))?;
        let traits = WeightKind::MUTABLE
            .into_iter()
            .map(|kind| {
                let values = genomes.iter().map(|g| g.weights().get(kind) as f32);
                Summary::new(values).map(|summary| (kind, summary))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { score, traits })
    }
}
