mod cask;
mod models;
mod root;
mod run;
mod search;

pub use root::Cli;
