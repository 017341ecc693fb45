//! Regression tests that run the `petstore` binary as a subprocess.

#[cfg(test)]
pub mod cli;
