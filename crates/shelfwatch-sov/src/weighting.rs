//! Rank-to-weight curves for visibility scoring.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// How much a listing at a given rank contributes to its brand's score.
///
/// Every curve is monotonically decreasing in rank:
///
/// | rank | reciprocal | exponential (base 0.5) | uniform |
/// |------|------------|------------------------|---------|
/// | 1    | 1          | 1                      | 1       |
/// | 2    | 0.5        | 0.5                    | 1       |
/// | 3    | 0.333…     | 0.25                   | 1       |
/// | 4    | 0.25       | 0.125                  | 1       |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankWeighting {
    /// `1 / rank`. The default: steep at the top, long tail after.
    Reciprocal,
    /// `base ^ (rank - 1)` for a base in (0, 1).
    Exponential { base: Decimal },
    /// Every appearance counts the same regardless of position.
    Uniform,
}

impl Default for RankWeighting {
    fn default() -> Self {
        Self::Reciprocal
    }
}

impl RankWeighting {
    /// Weight for a 1-indexed rank.
    ///
    /// Rank 0 is out of the domain and weighs nothing; the aggregator logs
    /// and skips such records before weighting, so this path is a backstop.
    #[must_use]
    pub fn weight(self, rank: u32) -> Decimal {
        if rank == 0 {
            return Decimal::ZERO;
        }
        match self {
            Self::Reciprocal => Decimal::ONE / Decimal::from(rank),
            Self::Exponential { base } => {
                let mut weight = Decimal::ONE;
                for _ in 1..rank {
                    weight *= base;
                    if weight.is_zero() {
                        break;
                    }
                }
                weight
            }
            Self::Uniform => Decimal::ONE,
        }
    }
}

impl FromStr for RankWeighting {
    type Err = String;

    /// Accepts `reciprocal`, `uniform`, `exponential` (base 0.5), or
    /// `exponential:<base>` with a base in (0, 1), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Some(raw_base) = lower.strip_prefix("exponential:") {
            let base: Decimal = raw_base
                .parse()
                .map_err(|_| format!("invalid exponential base '{raw_base}'"))?;
            if base <= Decimal::ZERO || base >= Decimal::ONE {
                return Err(format!(
                    "exponential base must be between 0 and 1 exclusive, got {base}"
                ));
            }
            return Ok(Self::Exponential { base });
        }
        match lower.as_str() {
            "reciprocal" => Ok(Self::Reciprocal),
            "exponential" => Ok(Self::Exponential {
                base: Decimal::new(5, 1),
            }),
            "uniform" => Ok(Self::Uniform),
            other => Err(format!(
                "unknown weighting '{other}' (expected reciprocal, exponential[:base], or uniform)"
            )),
        }
    }
}

impl fmt::Display for RankWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reciprocal => write!(f, "reciprocal"),
            Self::Exponential { base } => write!(f, "exponential:{base}"),
            Self::Uniform => write!(f, "uniform"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reciprocal_matches_documented_table() {
        let w = RankWeighting::Reciprocal;
        assert_eq!(w.weight(1), Decimal::ONE);
        assert_eq!(w.weight(2), Decimal::new(5, 1));
        assert_eq!(w.weight(3), Decimal::ONE / Decimal::from(3_u32));
        assert_eq!(w.weight(4), Decimal::new(25, 2));
    }

    #[test]
    fn exponential_decays_geometrically() {
        let w = RankWeighting::Exponential {
            base: Decimal::new(5, 1),
        };
        assert_eq!(w.weight(1), Decimal::ONE);
        assert_eq!(w.weight(2), Decimal::new(5, 1));
        assert_eq!(w.weight(3), Decimal::new(25, 2));
        assert_eq!(w.weight(4), Decimal::new(125, 3));
    }

    #[test]
    fn uniform_is_flat() {
        let w = RankWeighting::Uniform;
        for rank in 1..=50 {
            assert_eq!(w.weight(rank), Decimal::ONE);
        }
    }

    #[test]
    fn every_curve_is_monotonically_decreasing() {
        let curves = [
            RankWeighting::Reciprocal,
            RankWeighting::Exponential {
                base: Decimal::new(7, 1),
            },
            RankWeighting::Uniform,
        ];
        for curve in curves {
            for rank in 1..=20 {
                assert!(
                    curve.weight(rank) >= curve.weight(rank + 1),
                    "{curve} increased between rank {rank} and {}",
                    rank + 1
                );
            }
        }
    }

    #[test]
    fn rank_zero_weighs_nothing() {
        assert_eq!(RankWeighting::Reciprocal.weight(0), Decimal::ZERO);
        assert_eq!(RankWeighting::Uniform.weight(0), Decimal::ZERO);
    }

    #[test]
    fn deep_exponential_ranks_bottom_out_at_zero() {
        let w = RankWeighting::Exponential {
            base: Decimal::new(5, 1),
        };
        assert_eq!(w.weight(500), Decimal::ZERO);
    }

    #[test]
    fn parses_named_curves() {
        assert_eq!(
            "reciprocal".parse::<RankWeighting>(),
            Ok(RankWeighting::Reciprocal)
        );
        assert_eq!(
            "Uniform".parse::<RankWeighting>(),
            Ok(RankWeighting::Uniform)
        );
        assert_eq!(
            "exponential".parse::<RankWeighting>(),
            Ok(RankWeighting::Exponential {
                base: Decimal::new(5, 1)
            })
        );
        assert_eq!(
            "exponential:0.7".parse::<RankWeighting>(),
            Ok(RankWeighting::Exponential {
                base: Decimal::new(7, 1)
            })
        );
    }

    #[test]
    fn rejects_out_of_range_bases_and_unknown_names() {
        assert!("exponential:1.5".parse::<RankWeighting>().is_err());
        assert!("exponential:0".parse::<RankWeighting>().is_err());
        assert!("exponential:nope".parse::<RankWeighting>().is_err());
        assert!("steepest".parse::<RankWeighting>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for curve in [
            RankWeighting::Reciprocal,
            RankWeighting::Exponential {
                base: Decimal::new(7, 1),
            },
            RankWeighting::Uniform,
        ] {
            let reparsed: RankWeighting = curve.to_string().parse().unwrap();
            assert_eq!(reparsed, curve);
        }
    }
}
