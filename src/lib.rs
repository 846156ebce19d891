pub mod config;
pub mod coords;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod process;
pub mod server;
pub mod view;

#[cfg(test)]
mod testdata;
