// Selection metrics. Every metric walks the running digital sum of the
// candidate codeword's constellation points, starting from the feedback the
// previous winner left behind.

use crate::error::ConfigError;
use crate::field::Symbol;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMethod {
    /// Mean squared weight: sum of |RDS|^2 over the codeword.
    #[default]
    #[serde(rename = "MSW")]
    Msw,
    /// Weighted RDS with all weight on the last symbol: |RDS_L|^2.
    #[serde(rename = "WRDS")]
    Wrds,
    /// Second-order MSW: sum of |RDSS|^2, where RDSS is the running sum of RDS.
    #[serde(rename = "MSW2")]
    Msw2,
}

impl FromStr for SelectionMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MSW" => Ok(Self::Msw),
            "WRDS" => Ok(Self::Wrds),
            "MSW2" => Ok(Self::Msw2),
            _ => Err(ConfigError::BadSelectionMethod(s.to_string())),
        }
    }
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Msw => "MSW",
            Self::Wrds => "WRDS",
            Self::Msw2 => "MSW2",
        })
    }
}

/// Metric state carried from one codeword to the next.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub rds: Complex64,
    pub rdss: Complex64,
}

impl Feedback {
    pub fn new(starting_rds: Complex64) -> Self {
        Self {
            rds: starting_rds,
            rdss: Complex64::new(0.0, 0.0),
        }
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new(Complex64::new(1.0, 0.0))
    }
}

/// Cost of one candidate and the feedback it would commit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Analysis {
    pub cost: f64,
    pub feedback: Feedback,
}

impl SelectionMethod {
    /// Scores `codeword`. Pure: `feedback` is only read.
    pub fn analyze(
        self,
        codeword: &[Symbol],
        feedback: &Feedback,
        constellation: &[Complex64],
    ) -> Analysis {
        let mut rds = feedback.rds;
        let mut rdss = feedback.rdss;
        let mut cost = 0.0;
        for &symbol in codeword {
            rds += constellation[symbol as usize];
            rdss += rds;
            match self {
                Self::Msw => cost += rds.norm_sqr(),
                Self::Msw2 => cost += rdss.norm_sqr(),
                Self::Wrds => {}
            }
        }
        if self == Self::Wrds {
            cost = rds.norm_sqr();
        }
        Analysis {
            cost,
            feedback: Feedback { rds, rdss },
        }
    }
}

/// Whether `cost` beats the current best. Strict, so earlier (lower)
/// candidate indices win ties; a non-finite cost never beats anything and
/// any finite cost beats a non-finite best.
#[inline]
pub fn improves(cost: f64, best: f64) -> bool {
    cost.is_finite() && (!best.is_finite() || cost < best)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GF2_CODEWORD: [Symbol; 19] = [1, 1, 0, 1, 0, 1, 1, 1, 0, 1, 0, 0, 1, 1, 1, 1, 1, 1, 0];
    const GF4_CODEWORD: [Symbol; 23] = [
        3, 1, 1, 1, 0, 0, 1, 1, 3, 2, 2, 3, 3, 3, 1, 1, 2, 3, 3, 1, 0, 2, 3,
    ];

    fn bpsk() -> Vec<Complex64> {
        vec![Complex64::new(-1.0, 0.0), Complex64::new(1.0, 0.0)]
    }

    fn qpsk() -> Vec<Complex64> {
        vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(-1.0, 0.0),
        ]
    }

    #[test]
    fn test_msw_gf2() {
        let analysis =
            SelectionMethod::Msw.analyze(&GF2_CODEWORD, &Feedback::default(), &bpsk());
        assert_eq!(analysis.cost, 481.0);
        assert_eq!(analysis.feedback.rds, Complex64::new(8.0, 0.0));
        assert_eq!(analysis.feedback.rdss, Complex64::new(87.0, 0.0));
    }

    #[test]
    fn test_msw_gf4() {
        let analysis =
            SelectionMethod::Msw.analyze(&GF4_CODEWORD, &Feedback::default(), &qpsk());
        assert!((analysis.cost - 429.0).abs() < 1e-9);
        assert!((analysis.feedback.rds - Complex64::new(-4.0, 4.0)).norm() < 1e-9);
    }

    #[test]
    fn test_wrds_and_msw2() {
        let feedback = Feedback::default();
        let wrds = SelectionMethod::Wrds.analyze(&GF2_CODEWORD, &feedback, &bpsk());
        assert_eq!(wrds.cost, 64.0);
        let msw2 = SelectionMethod::Msw2.analyze(&GF2_CODEWORD, &feedback, &bpsk());
        assert_eq!(msw2.cost, 36242.0);

        let wrds = SelectionMethod::Wrds.analyze(&GF4_CODEWORD, &feedback, &qpsk());
        assert!((wrds.cost - 32.0).abs() < 1e-9);
        let msw2 = SelectionMethod::Msw2.analyze(&GF4_CODEWORD, &feedback, &qpsk());
        assert!((msw2.cost - 47408.0).abs() < 1e-9);
    }

    #[test]
    fn test_analysis_continues_from_feedback() {
        let (head, tail) = GF2_CODEWORD.split_at(7);
        let method = SelectionMethod::Msw2;
        let whole = method.analyze(&GF2_CODEWORD, &Feedback::default(), &bpsk());
        let first = method.analyze(head, &Feedback::default(), &bpsk());
        let second = method.analyze(tail, &first.feedback, &bpsk());
        assert_eq!(second.feedback, whole.feedback);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("MSW".parse::<SelectionMethod>().unwrap(), SelectionMethod::Msw);
        assert_eq!("wrds".parse::<SelectionMethod>().unwrap(), SelectionMethod::Wrds);
        assert_eq!("MSW2".parse::<SelectionMethod>().unwrap(), SelectionMethod::Msw2);
        assert!(matches!(
            "RDS".parse::<SelectionMethod>(),
            Err(ConfigError::BadSelectionMethod(_))
        ));
        let json = serde_json::to_string(&SelectionMethod::Msw2).unwrap();
        assert_eq!(json, "\"MSW2\"");
    }

    #[test]
    fn test_improves() {
        assert!(improves(1.0, 2.0));
        assert!(!improves(2.0, 2.0));
        assert!(!improves(f64::NAN, 2.0));
        assert!(improves(5.0, f64::INFINITY));
        assert!(!improves(f64::INFINITY, f64::INFINITY));
    }
}
