pub mod activities;
pub mod bootstrap;
pub mod contracts;
pub mod ports;
