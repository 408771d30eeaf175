pub mod builder;
pub mod zip_engine;
