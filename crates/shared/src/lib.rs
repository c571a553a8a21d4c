pub mod compose;
pub mod config;
mod config_env;
pub mod dimensions;
pub mod models;
pub mod normalize;
pub mod query_builder;
pub mod query_engine;
pub mod slot_memory;
pub mod slots;
pub mod top_intent;
