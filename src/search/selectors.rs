//! Final-move selection policies.
//!
//! Search produces a ranked shortlist; a selector picks one entry from it.
//! This is where variety or deliberate weakness is injected without touching
//! search correctness. Randomised selectors take the RNG as an argument so
//! tests can seed it.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

pub trait Selector: Send + Sync + fmt::Debug {
    /// Index of the chosen score, `None` only for an empty slice.
    fn select_index(&self, scores: &[f64], rng: &mut dyn RngCore) -> Option<usize>;

    fn name(&self) -> &'static str;
}

/// Picks from `items` by the matching `scores`.
pub fn select<'a, T>(
    selector: &dyn Selector,
    items: &'a [T],
    scores: &[f64],
    rng: &mut dyn RngCore,
) -> Option<&'a T> {
    if items.len() != scores.len() {
        return None;
    }
    selector.select_index(scores, rng).and_then(|i| items.get(i))
}

/// Always the highest score; ties go to the earliest entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySelector;

impl Selector for GreedySelector {
    fn select_index(&self, scores: &[f64], _rng: &mut dyn RngCore) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, score) in scores.iter().enumerate() {
            match best {
                Some(b) if scores[b] >= *score => {}
                _ => best = Some(i),
            }
        }
        best
    }

    fn name(&self) -> &'static str {
        "GreedySelector"
    }
}

/// Uniform over the shortlist, ignoring scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl Selector for RandomSelector {
    fn select_index(&self, scores: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
        if scores.is_empty() {
            return None;
        }
        Some(rng.random_range(0..scores.len()))
    }

    fn name(&self) -> &'static str {
        "RandomSelector"
    }
}

/// Greedy with probability `epsilon`, otherwise uniform.
#[derive(Debug, Clone, Copy)]
pub struct EpsGreedySelector {
    epsilon: f64,
}

impl EpsGreedySelector {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.clamp(0.0, 1.0),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Selector for EpsGreedySelector {
    fn select_index(&self, scores: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
        if rng.random::<f64>() < self.epsilon {
            GreedySelector.select_index(scores, rng)
        } else {
            RandomSelector.select_index(scores, rng)
        }
    }

    fn name(&self) -> &'static str {
        "EpsGreedySelector"
    }
}

/// Samples proportionally to `exp(score)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftmaxSelector;

impl Selector for SoftmaxSelector {
    fn select_index(&self, scores: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
        let cap = f64::MAX / scores.len().max(1) as f64;
        let weights: Vec<f64> = scores
            .iter()
            .map(|s| {
                let e = s.exp();
                if e == 0.0 {
                    1e-8
                } else if e.is_infinite() {
                    cap
                } else {
                    e
                }
            })
            .collect();
        sample_weighted(&weights, rng)
    }

    fn name(&self) -> &'static str {
        "SoftmaxSelector"
    }
}

/// Samples proportionally to `ln(1 + exp(score))`, which is linear for large
/// scores and never negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftplusSelector;

#[inline]
pub fn softplus(x: f64) -> f64 {
    if x >= 15.0 {
        x
    } else {
        x.exp().ln_1p()
    }
}

impl Selector for SoftplusSelector {
    fn select_index(&self, scores: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
        let weights: Vec<f64> = scores.iter().map(|s| softplus(*s)).collect();
        sample_weighted(&weights, rng)
    }

    fn name(&self) -> &'static str {
        "SoftplusSelector"
    }
}

/// Roulette-wheel draw. Rounding leftovers fall to the last entry.
fn sample_weighted(weights: &[f64], rng: &mut dyn RngCore) -> Option<usize> {
    let last = weights.len().checked_sub(1)?;
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Some(last);
    }
    let mut remaining = rng.random::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        remaining -= w;
        if remaining <= 0.0 {
            return Some(i);
        }
    }
    Some(last)
}

/// Serializable selector choice used by configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectorKind {
    #[default]
    Greedy,
    Random,
    EpsGreedy {
        epsilon: f64,
    },
    Softmax,
    Softplus,
}

impl SelectorKind {
    pub fn build(self) -> Box<dyn Selector> {
        match self {
            SelectorKind::Greedy => Box::new(GreedySelector),
            SelectorKind::Random => Box::new(RandomSelector),
            SelectorKind::EpsGreedy { epsilon } => Box::new(EpsGreedySelector::new(epsilon)),
            SelectorKind::Softmax => Box::new(SoftmaxSelector),
            SelectorKind::Softplus => Box::new(SoftplusSelector),
        }
    }
}
