//! Weighted quality score.
//!
//! Each metric group contributes a (score, weight) pair only when its data
//! was actually collected. Absent groups drop out of both the numerator and
//! the denominator, so missing data never reads as "measured and bad".

use crate::config::ScoreWeights;
use crate::domain::{
    ArchitectureMetrics, BuildMetrics, CodeMetrics, DocsMetrics, ScoreComponent, ScoreSource,
    TestMetrics,
};

/// Average complexity above which the code score is penalized.
pub const COMPLEXITY_THRESHOLD: f64 = 10.0;
/// Points removed per unit of complexity above the threshold.
pub const COMPLEXITY_PENALTY_PER_UNIT: f64 = 5.0;
/// Largest complexity penalty.
pub const MAX_COMPLEXITY_PENALTY: f64 = 50.0;
/// Build score granted for a successful compile.
pub const COMPILE_SUCCESS_POINTS: f64 = 50.0;

/// Borrowed view of every metric group feeding the score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    /// Code tally.
    pub code: &'a CodeMetrics,
    /// Architecture heuristics.
    pub architecture: &'a ArchitectureMetrics,
    /// Test results.
    pub test: &'a TestMetrics,
    /// Build results.
    pub build: &'a BuildMetrics,
    /// Documentation inventory.
    pub docs: &'a DocsMetrics,
}

/// Build score: compile bonus plus a quarter of the free RAM and Flash
/// headroom.
pub fn build_score(metrics: &BuildMetrics) -> f64 {
    let compiled = if metrics.compilation_success {
        COMPILE_SUCCESS_POINTS
    } else {
        0.0
    };
    let ram = (100.0 - metrics.ram_usage_percent).max(0.0);
    let flash = (100.0 - metrics.flash_usage_percent).max(0.0);
    clamp_score(compiled + (ram + flash) / 4.0)
}

/// Code score: 100 minus a capped penalty for high average complexity.
pub fn code_score(metrics: &CodeMetrics) -> f64 {
    let mut score = 100.0;
    if metrics.avg_complexity > COMPLEXITY_THRESHOLD {
        score -= ((metrics.avg_complexity - COMPLEXITY_THRESHOLD) * COMPLEXITY_PENALTY_PER_UNIT)
            .min(MAX_COMPLEXITY_PENALTY);
    }
    clamp_score(score)
}

/// Collect the components whose data is available, in fixed source order.
pub fn score_components(inputs: ScoreInputs<'_>, weights: &ScoreWeights) -> Vec<ScoreComponent> {
    let candidates = [
        (
            ScoreSource::Architecture,
            Some(inputs.architecture.architecture_score),
            weights.architecture,
        ),
        (
            ScoreSource::Test,
            inputs
                .test
                .is_measured()
                .then_some(inputs.test.test_success_rate),
            weights.test,
        ),
        (
            ScoreSource::Build,
            inputs
                .build
                .log_status
                .is_parsed()
                .then(|| build_score(inputs.build)),
            weights.build,
        ),
        (
            ScoreSource::Code,
            (inputs.code.scanned_files() > 0).then(|| code_score(inputs.code)),
            weights.code,
        ),
        (ScoreSource::Docs, Some(inputs.docs.score), weights.docs),
    ];

    candidates
        .into_iter()
        .filter_map(|(source, score, weight)| {
            score.map(|score| ScoreComponent {
                source,
                score: clamp_score(score),
                weight,
            })
        })
        .collect()
}

/// Weighted mean of the present components, or 0 when none carry weight.
pub fn combine(components: &[ScoreComponent]) -> f64 {
    let total_weight: f64 = components.iter().map(|component| component.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = components
        .iter()
        .map(|component| component.score * component.weight)
        .sum();
    clamp_score(weighted / total_weight)
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::{ScoreInputs, build_score, code_score, combine, score_components};
    use crate::config::ScoreWeights;
    use crate::decode::Encoding;
    use crate::domain::{
        ArchitectureMetrics, BuildMetrics, CodeMetrics, DocsMetrics, LogStatus, ScoreComponent,
        ScoreSource, SummaryFormat, TestMetrics,
    };

    fn component(source: ScoreSource, score: f64, weight: f64) -> ScoreComponent {
        ScoreComponent {
            source,
            score,
            weight,
        }
    }

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn combine_of_nothing_is_zero() {
        assert_eq!(combine(&[]), 0.0);
        assert_eq!(combine(&[component(ScoreSource::Docs, 80.0, 0.0)]), 0.0);
    }

    #[test]
    fn combine_normalizes_over_present_sources() {
        let all = [
            component(ScoreSource::Architecture, 60.0, 0.30),
            component(ScoreSource::Test, 80.0, 0.25),
            component(ScoreSource::Build, 90.0, 0.20),
            component(ScoreSource::Code, 100.0, 0.15),
            component(ScoreSource::Docs, 50.0, 0.10),
        ];
        let expected = 60.0 * 0.30 + 80.0 * 0.25 + 90.0 * 0.20 + 100.0 * 0.15 + 50.0 * 0.10;
        assert!(close(combine(&all), expected));

        let subset = [all[0], all[4]];
        let expected = (60.0 * 0.30 + 50.0 * 0.10) / 0.40;
        assert!(close(combine(&subset), expected));

        assert!(close(combine(&[all[1]]), 80.0));
    }

    #[test]
    fn combined_score_stays_in_range() {
        let components = [
            component(ScoreSource::Architecture, 100.0, 0.30),
            component(ScoreSource::Docs, 100.0, 0.10),
        ];
        assert!(close(combine(&components), 100.0));
        let zeros = [component(ScoreSource::Code, 0.0, 0.15)];
        assert_eq!(combine(&zeros), 0.0);
    }

    #[test]
    fn build_score_rewards_success_and_headroom() {
        let metrics = BuildMetrics {
            compilation_success: true,
            ram_usage_percent: 40.0,
            flash_usage_percent: 20.0,
            ..BuildMetrics::default()
        };
        assert!(close(build_score(&metrics), 50.0 + (60.0 + 80.0) / 4.0));

        let failed = BuildMetrics {
            ram_usage_percent: 120.0,
            flash_usage_percent: 100.0,
            ..BuildMetrics::default()
        };
        assert_eq!(build_score(&failed), 0.0);
    }

    #[test]
    fn code_score_penalty_is_capped() {
        let mut metrics = CodeMetrics::default();
        metrics.avg_complexity = 8.0;
        assert_eq!(code_score(&metrics), 100.0);
        metrics.avg_complexity = 12.0;
        assert_eq!(code_score(&metrics), 90.0);
        metrics.avg_complexity = 40.0;
        assert_eq!(code_score(&metrics), 50.0);
    }

    #[test]
    fn unmeasured_sources_are_skipped() {
        let code = CodeMetrics::default();
        let architecture = ArchitectureMetrics {
            architecture_score: 40.0,
            ..ArchitectureMetrics::default()
        };
        let test = TestMetrics::default();
        let build = BuildMetrics::default();
        let docs = DocsMetrics {
            score: 50.0,
            ..DocsMetrics::default()
        };

        let components = score_components(
            ScoreInputs {
                code: &code,
                architecture: &architecture,
                test: &test,
                build: &build,
                docs: &docs,
            },
            &ScoreWeights::default(),
        );

        let sources: Vec<ScoreSource> = components.iter().map(|c| c.source).collect();
        assert_eq!(sources, vec![ScoreSource::Architecture, ScoreSource::Docs]);
        assert!(close(combine(&components), (40.0 * 0.30 + 50.0 * 0.10) / 0.40));
    }

    #[test]
    fn measured_sources_are_included() {
        let mut code = CodeMetrics::default();
        code.source_files = 1;
        code.avg_complexity = 11.0;
        let architecture = ArchitectureMetrics::default();
        let test = TestMetrics {
            test_success_rate: 80.0,
            summary_format: Some(SummaryFormat::Unity),
            ..TestMetrics::default()
        };
        let build = BuildMetrics {
            compilation_success: true,
            log_status: LogStatus::Parsed {
                encoding: Encoding::Utf8,
            },
            ..BuildMetrics::default()
        };
        let docs = DocsMetrics::default();

        let components = score_components(
            ScoreInputs {
                code: &code,
                architecture: &architecture,
                test: &test,
                build: &build,
                docs: &docs,
            },
            &ScoreWeights::default(),
        );

        assert_eq!(components.len(), 5);
        assert_eq!(components[1].score, 80.0);
        assert_eq!(components[2].score, 100.0);
        assert_eq!(components[3].score, 95.0);
    }
}
