// Library exports for testing
// The binary (main.rs) imports these as well

pub mod actions;
pub mod cli;
pub mod error;
pub mod logger;

#[cfg(test)]
mod tests;
