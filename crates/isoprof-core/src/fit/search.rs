use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::consts::NO_CHANGE_FACTOR;
use crate::error::{IsoprofError, Result};
use crate::frame::Frame;
use crate::stats::{inv_to_eps, to_eps, to_pa};

use super::config::FitConfig;
use super::loss::FourierLoss;
use super::types::{IsophoteGuess, ProgressReporter};

/// A full snapshot of the parameter arrays together with its loss at the
/// radius being refined.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub ellipticity: Vec<f64>,
    pub position_angle: Vec<f64>,
    pub loss: f64,
}

/// Which parameters a perturbation touches, cycling with the iteration count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerturbMode {
    Ellipticity,
    Both,
    PositionAngle,
}

impl PerturbMode {
    pub fn for_iteration(iteration: usize) -> Self {
        match iteration % 3 {
            0 => Self::Ellipticity,
            1 => Self::Both,
            _ => Self::PositionAngle,
        }
    }

    fn ellipticity(self) -> bool {
        matches!(self, Self::Ellipticity | Self::Both)
    }

    fn position_angle(self) -> bool {
        matches!(self, Self::PositionAngle | Self::Both)
    }
}

/// Final state of a finished search.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub ellipticity: Vec<f64>,
    pub position_angle: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Stochastic local search over per-radius ellipticity and position angle.
///
/// Every global iteration visits the radii in a shuffled order. Each visit
/// compares the current arrays against a handful of random single-radius
/// perturbations and keeps the lowest loss.
pub struct IsophoteSearch<'a> {
    loss: FourierLoss<'a>,
    radii: &'a [f64],
    config: &'a FitConfig,
    ellipticity: Vec<f64>,
    position_angle: Vec<f64>,
    ellipticity_step: Normal<f64>,
    position_angle_step: Normal<f64>,
    iteration: usize,
    no_change: usize,
}

impl<'a> IsophoteSearch<'a> {
    pub fn new(
        frame: &'a Frame,
        guess: &IsophoteGuess,
        radii: &'a [f64],
        config: &'a FitConfig,
    ) -> Result<Self> {
        if radii.is_empty() {
            return Err(IsoprofError::InvalidParameter(
                "no sample radii to fit".into(),
            ));
        }
        let ellipticity_step = Normal::new(0.0, config.perturbation.ellipticity_step)
            .map_err(|e| IsoprofError::InvalidParameter(format!("ellipticity step: {e}")))?;
        let position_angle_step = Normal::new(0.0, config.perturbation.position_angle_step)
            .map_err(|e| IsoprofError::InvalidParameter(format!("position angle step: {e}")))?;

        Ok(Self {
            loss: FourierLoss::new(
                frame,
                guess.center,
                guess.background_noise,
                config.loss,
                config.interpolation_radius,
            ),
            radii,
            config,
            ellipticity: vec![guess.ellipticity; radii.len()],
            position_angle: vec![to_pa(guess.position_angle); radii.len()],
            ellipticity_step,
            position_angle_step,
            iteration: 0,
            no_change: 0,
        })
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Consecutive radius updates that kept the current arrays.
    pub fn no_change(&self) -> usize {
        self.no_change
    }

    pub fn no_change_limit(&self) -> usize {
        NO_CHANGE_FACTOR * self.radii.len()
    }

    pub fn is_converged(&self) -> bool {
        self.no_change >= self.no_change_limit()
    }

    pub fn is_finished(&self) -> bool {
        self.iteration >= self.config.max_iterations || self.is_converged()
    }

    pub fn ellipticity(&self) -> &[f64] {
        &self.ellipticity
    }

    pub fn position_angle(&self) -> &[f64] {
        &self.position_angle
    }

    fn reg_scale(&self) -> f64 {
        if self.iteration > self.config.regularize_after {
            self.config.regularize_scale
        } else {
            0.0
        }
    }

    fn evaluate(&mut self, ellipticity: Vec<f64>, position_angle: Vec<f64>, i: usize) -> Candidate {
        let reg_scale = self.reg_scale();
        let loss = self
            .loss
            .evaluate(self.radii, &ellipticity, &position_angle, i, reg_scale);
        Candidate {
            ellipticity,
            position_angle,
            loss,
        }
    }

    /// Refine radius index `i` once. Returns `true` when a perturbation won and
    /// was committed.
    pub fn refine_radius<R: Rng + ?Sized>(&mut self, i: usize, rng: &mut R) -> bool {
        let mode = PerturbMode::for_iteration(self.iteration);

        let mut candidates = Vec::with_capacity(self.config.perturbation.count + 1);
        candidates.push(self.evaluate(self.ellipticity.clone(), self.position_angle.clone(), i));

        for _ in 0..self.config.perturbation.count {
            let mut ellipticity = self.ellipticity.clone();
            let mut position_angle = self.position_angle.clone();
            if mode.ellipticity() {
                ellipticity[i] = to_eps(inv_to_eps(ellipticity[i]) + self.ellipticity_step.sample(rng));
            }
            if mode.position_angle() {
                position_angle[i] = to_pa(position_angle[i] + self.position_angle_step.sample(rng));
            }
            candidates.push(self.evaluate(ellipticity, position_angle, i));
        }

        // Strict comparison: ties keep the earliest candidate, the unchanged arrays.
        let mut best = 0;
        for (k, c) in candidates.iter().enumerate().skip(1) {
            if c.loss < candidates[best].loss {
                best = k;
            }
        }

        if best > 0 {
            let winner = candidates.swap_remove(best);
            self.ellipticity = winner.ellipticity;
            self.position_angle = winner.position_angle;
            self.no_change = 0;
            true
        } else {
            self.no_change += 1;
            false
        }
    }

    /// One global iteration: every radius is refined once, in random order.
    pub fn run_iteration<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.iteration % 10 == 0 {
            debug!(iteration = self.iteration, no_change = self.no_change, "Isophote search");
        }
        self.iteration += 1;

        let mut order: Vec<usize> = (0..self.radii.len()).collect();
        order.shuffle(rng);
        for i in order {
            self.refine_radius(i, rng);
        }
    }

    /// Iterate until the no-change criterion or the iteration cap is met.
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R, reporter: &dyn ProgressReporter) -> SearchOutcome {
        while !self.is_finished() {
            self.run_iteration(rng);
            reporter.advance(self.iteration);
        }
        SearchOutcome {
            converged: self.is_converged(),
            iterations: self.iteration,
            ellipticity: self.ellipticity,
            position_angle: self.position_angle,
        }
    }
}
