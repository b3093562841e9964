//! Route chromosome for the GA runner.
//!
//! Wraps an [`Encoding`] together with the scalar fitness the
//! [`GaRunner`](u_metaheur::ga::GaRunner) ranks by.

use u_metaheur::ga::Individual;

use crate::models::Encoding;

/// A separator encoding carried through the genetic algorithm.
///
/// Fitness starts at `f64::INFINITY` (unevaluated); lower is better.
///
/// # Examples
///
/// ```
/// use u_cvrptw::ga::RouteChromosome;
/// use u_cvrptw::models::Encoding;
/// use u_metaheur::ga::Individual;
///
/// let chromosome = RouteChromosome::new(Encoding::new(vec![3, 1, 0, 2]));
/// assert_eq!(chromosome.encoding().genes(), &[3, 1, 0, 2]);
/// assert_eq!(chromosome.fitness(), f64::INFINITY);
/// ```
#[derive(Debug, Clone)]
pub struct RouteChromosome {
    encoding: Encoding,
    fitness: f64,
}

impl RouteChromosome {
    /// Creates an unevaluated chromosome.
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            fitness: f64::INFINITY,
        }
    }

    /// The underlying encoding.
    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Mutable access for in-place operators.
    pub fn encoding_mut(&mut self) -> &mut Encoding {
        &mut self.encoding
    }

    /// Consumes the chromosome, returning the encoding.
    pub fn into_encoding(self) -> Encoding {
        self.encoding
    }
}

impl From<Encoding> for RouteChromosome {
    fn from(encoding: Encoding) -> Self {
        Self::new(encoding)
    }
}

impl Individual for RouteChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}
