#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(test, deny(warnings))]

mod gate;
pub use self::gate::{GateState, ReleaseGate};
