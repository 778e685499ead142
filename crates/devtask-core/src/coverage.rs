use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Width added to the printed values when sizing the banner rule.
const BANNER_PADDING: usize = 34;

static PERCENT_RE: OnceLock<Regex> = OnceLock::new();

fn percent_re() -> &'static Regex {
    PERCENT_RE.get_or_init(|| Regex::new(r"([0-9]+\.[0-9]+)%").unwrap())
}

/// Every `<digits>.<digits>%` figure in `output`, in order of appearance.
pub fn parse_samples(output: &str) -> Vec<f64> {
    percent_re()
        .captures_iter(output)
        .filter_map(|cap| cap[1].parse::<f64>().ok())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageReport {
    pub packages: usize,
    /// Mean of the samples rounded to one decimal; 0.0 without samples.
    pub mean: f64,
}

impl CoverageReport {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                packages: 0,
                mean: 0.0,
            };
        }
        let sum: f64 = samples.iter().sum();
        Self {
            packages: samples.len(),
            mean: round1(sum / samples.len() as f64),
        }
    }

    pub fn from_output(output: &str) -> Self {
        Self::from_samples(&parse_samples(output))
    }

    /// Rule line, summary line, rule line.
    pub fn banner(&self) -> String {
        let packages = self.packages.to_string();
        let mean = format!("{:.1}", self.mean);
        let rule = "=".repeat(packages.len() + mean.len() + BANNER_PADDING);
        format!("{rule}\n    Total Coverage ({packages} pkg) : {mean}%\n{rule}")
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.banner())
    }
}

/// Round to one decimal, ties to even on the exact binary value.
fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_packages_average() {
        let output = "ok pkgA 0.5s coverage: 80.0% of statements\n\
                      ok pkgB 0.3s coverage: 60.0% of statements\n";
        let report = CoverageReport::from_output(output);
        assert_eq!(report.packages, 2);
        assert_eq!(report.mean, 70.0);
    }

    #[test]
    fn no_coverage_lines_is_zero() {
        let report = CoverageReport::from_output("ok pkgA 0.5s [no test files]\nDONE 0 tests\n");
        assert_eq!(report.packages, 0);
        assert_eq!(report.mean, 0.0);
    }

    #[test]
    fn empty_output_is_zero() {
        assert_eq!(
            CoverageReport::from_output(""),
            CoverageReport {
                packages: 0,
                mean: 0.0
            }
        );
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        let report = CoverageReport::from_samples(&[33.3, 33.3, 33.4, 50.0]);
        assert_eq!(report.packages, 4);
        assert_eq!(report.mean, 37.5);

        let report = CoverageReport::from_samples(&[10.0, 20.0, 20.0]);
        assert_eq!(report.mean, 16.7);
    }

    #[test]
    fn mean_ties_round_to_even() {
        // 75.25 is exact in binary and lands on the even digit
        assert_eq!(CoverageReport::from_samples(&[80.0, 70.5]).mean, 75.2);
        // 1.45 is stored just below the tie
        assert_eq!(CoverageReport::from_samples(&[1.4, 1.5]).mean, 1.4);
    }

    #[test]
    fn integer_percentages_are_not_samples() {
        assert!(parse_samples("progress 100% done").is_empty());
        assert_eq!(parse_samples("coverage: 100.0% of statements"), vec![100.0]);
    }

    #[test]
    fn every_match_on_a_line_counts() {
        let samples = parse_samples("a 12.5% b 7.25% c 3.0 %");
        assert_eq!(samples, vec![12.5, 7.25]);
    }

    #[test]
    fn banner_rule_tracks_value_width() {
        let report = CoverageReport {
            packages: 2,
            mean: 70.0,
        };
        let banner = report.banner();
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(1 + 4 + 34));
        assert_eq!(lines[1], "    Total Coverage (2 pkg) : 70.0%");
        assert_eq!(lines[0], lines[2]);
    }

    #[test]
    fn banner_for_empty_report() {
        let report = CoverageReport::from_samples(&[]);
        let banner = report.to_string();
        assert!(banner.contains("Total Coverage (0 pkg) : 0.0%"));
        assert!(banner.starts_with(&"=".repeat(38)));
    }
}
