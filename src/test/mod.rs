mod fixture;

mod config;
mod cooldowns;
mod encounter;
mod random;
mod resource;
mod sim_time;
mod simulator;
