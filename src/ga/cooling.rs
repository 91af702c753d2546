//! Temperature schedules for annealing replacement.
//!
//! The driver owns the temperature and cools it once per generation. Every
//! schedule is monotonically non-increasing and never goes below the floor.
//!
//! # References
//!
//! - Kirkpatrick et al. (1983), "Optimization by Simulated Annealing"
//! - Lundy & Mees (1986), "Convergence of an annealing algorithm"

/// Cooling schedule for temperature reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// `T_{k+1} = alpha * T_k`, with `alpha` in (0, 1).
    Geometric { alpha: f64 },

    /// `T_k = T_0 - k * (T_0 - T_min) / max_generations`.
    Linear,

    /// `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// Cools fast at high T, slow at low T.
    LundyMees { beta: f64 },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

impl CoolingSchedule {
    /// Temperature after generation `generation` (0-based) has finished.
    pub fn cool(
        &self,
        temperature: f64,
        initial: f64,
        floor: f64,
        generation: usize,
        max_generations: usize,
    ) -> f64 {
        let next = match *self {
            CoolingSchedule::Geometric { alpha } => temperature * alpha,
            CoolingSchedule::Linear => {
                if max_generations == 0 {
                    floor
                } else {
                    initial - (generation + 1) as f64 * (initial - floor) / max_generations as f64
                }
            }
            CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
        };
        next.min(temperature).max(floor)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        match *self {
            CoolingSchedule::Geometric { alpha } if !(alpha > 0.0 && alpha < 1.0) => {
                Err(format!("geometric alpha must be in (0, 1), got {alpha}"))
            }
            CoolingSchedule::LundyMees { beta } if !(beta > 0.0 && beta.is_finite()) => {
                Err(format!("Lundy-Mees beta must be positive, got {beta}"))
            }
            _ => Ok(()),
        }
    }
}
