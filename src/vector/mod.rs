//! Derivative-free minimizers that search a bounded box in any number of dimensions.
//!
//! All of them implement [`Minimizer`](crate::Minimizer) and can be swapped for one another.

mod pso;
pub use self::pso::ParticleSwarm;
pub use self::pso::ParticleSwarmBuilder;

mod lus;
pub use self::lus::LocalUnimodalSampling;
pub use self::lus::LocalUnimodalSamplingBuilder;

mod de;
pub use self::de::DifferentialEvolution;
pub use self::de::DifferentialEvolutionBuilder;

mod abc;
pub use self::abc::BeeColony;
pub use self::abc::BeeColonyBuilder;
