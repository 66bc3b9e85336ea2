//! Weighted random selection and the post-draw weight update.
//!
//! Each option holds `weight` tickets; a draw picks one ticket uniformly.
//! After a committed draw the picked option drops to weight 0 and every
//! other option gains one ticket, so repeats become unlikely without ever
//! being excluded outright.

use rand::Rng;
use rand::rngs::StdRng;

use crate::option::WheelOption;

/// Result of a weighted draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    /// The option that was drawn, as it was before any rebalance.
    pub option: WheelOption,
    /// Ticket index that was drawn (0-based, below `total_weight`).
    pub roll: u64,
    /// Sum of weights across the candidate set.
    pub total_weight: u64,
    /// Number of candidates the draw was made from.
    pub candidates: usize,
}

impl Draw {
    /// Name of the drawn option.
    pub fn name(&self) -> &str {
        &self.option.name
    }

    /// Probability the drawn option had, as a percentage.
    pub fn odds_percent(&self) -> f64 {
        if self.total_weight == 0 {
            return 0.0;
        }
        f64::from(self.option.weight) * 100.0 / self.total_weight as f64
    }
}

/// Pick one option with probability proportional to its weight.
///
/// Returns `None` when there are no options or every weight is 0.
pub fn weighted_pick(options: &[WheelOption], rng: &mut StdRng) -> Option<Draw> {
    let total_weight: u64 = options.iter().map(|o| u64::from(o.weight)).sum();
    if total_weight == 0 {
        return None;
    }

    let roll = rng.random_range(0..total_weight);
    let mut cursor = roll;
    for option in options {
        let weight = u64::from(option.weight);
        if cursor < weight {
            return Some(Draw {
                option: option.clone(),
                roll,
                total_weight,
                candidates: options.len(),
            });
        }
        cursor -= weight;
    }
    None
}

/// Options carrying every requested tag (AND semantics).
///
/// Blank requested tags are ignored. Callers treat an empty request as "no
/// filter" and skip this function.
pub fn filter_by_tags<S: AsRef<str>>(options: &[WheelOption], tags: &[S]) -> Vec<WheelOption> {
    let wanted: Vec<&str> = tags
        .iter()
        .map(|t| {
            let tag: &str = t.as_ref();
            tag.trim()
        })
        .filter(|t| !t.is_empty())
        .collect();
    options
        .iter()
        .filter(|o| o.has_all_tags(&wanted))
        .cloned()
        .collect()
}

/// Reset the picked option's weight to 0 and add 1 to every other weight.
pub fn rebalance(options: &mut [WheelOption], picked: &str) {
    for option in options {
        if option.name == picked {
            option.weight = 0;
        } else {
            option.weight = option.weight.saturating_add(1);
        }
    }
}
