pub mod aura;
pub mod config;
pub mod cooldown;
pub mod encounter;
pub mod error;
pub mod log;
pub mod random;
pub mod resource;
pub mod sim;
pub mod spell;
pub mod stats;
pub mod timer;
pub mod unit;

#[cfg(test)]
mod test;
