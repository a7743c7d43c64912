pub mod config;
pub mod entries;
pub mod run;
