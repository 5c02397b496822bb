pub mod controls;
pub mod protocol;
pub mod session;
pub mod state;
pub mod stream;
pub mod transport;

#[cfg(test)]
#[path = "../../tests/unit/device/mock.rs"]
pub(crate) mod mock;
