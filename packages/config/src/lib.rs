// ABOUTME: Shared configuration names for todoinfo
// ABOUTME: Keeps env var spellings in one place for the CLI and its tests

pub mod constants;

pub use constants::*;
