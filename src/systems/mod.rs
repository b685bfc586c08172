//! Systems module - recoil math and the ECS systems that run it.

pub mod debug;
pub mod easing;
pub mod preview;
pub mod recoil;
pub mod sampler;
