//! [`Communicator`][crate::Communicator] implementation for separate OS processes.
//!
//! Every process of the group runs its own [`World`], which listens for deliveries
//! from peers over gRPC. Addresses of all ranks are described by [`WorldConfig`],
//! which the [launcher][crate::launch::Launcher] passes through environment variables.

pub mod config;
mod messenger;
mod world;

pub use config::WorldConfig;
pub use world::World;
