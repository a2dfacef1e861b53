//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one part of the rig
//! through [`RigService`](tankrig::app::service::RigService) against the
//! recording mocks in `mock_hw`.  Everything runs on the host.

mod gate_cycle_tests;
mod mock_hw;
mod power_loss_tests;
mod tank_cycle_tests;
