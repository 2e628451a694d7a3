// Application layer: demo routines shared by the binaries.

pub mod console;
pub mod demos;
