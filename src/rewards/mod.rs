//! Rewards module: the owned ledger, its snapshot store, delayed actions and the simulated feed.
pub mod actions;
pub mod amount;
pub mod config;
pub mod errors;
pub mod events;
pub mod history;
pub mod ledger;
pub mod plugin;
pub mod referral;
pub mod simulated;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod systems;

pub use plugin::RewardsPlugin;
