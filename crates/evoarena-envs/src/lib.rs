//! Concrete environments implementing the `evoarena-core` contract.
//!
//! - [`ToyEnvironment`]: one-step environment scoring the sum of the action
//!   vector, in solo and multi-agent (swarm) flavors. Useful for smoke tests
//!   and as the smallest possible example of the contract.
//! - [`PaddleEnvironment`]: a two-player paddle-and-ball game with specular
//!   reflection physics.
//! - [`FlyerEnvironment`]: a thrust-controlled flyer collecting waypoint
//!   targets.

pub use self::{flyer::FlyerEnvironment, paddle::PaddleEnvironment, toy::ToyEnvironment};

mod flyer;
mod paddle;
mod toy;
