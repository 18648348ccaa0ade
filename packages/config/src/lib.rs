// ABOUTME: Configuration management for lispbook
// ABOUTME: Environment variable names and their defaults

pub mod constants;
