//! precland_core - Pure no_std parameter registry for precision landing
//!
//! This crate contains the platform-agnostic parameter types and the
//! precision landing parameter table. It can be tested on host without any
//! feature flags or embedded dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **Static schema**: Every parameter is declared once in a `'static` table
//! - **Lock-free reads**: Control code reads parameters without blocking
//!
//! # Modules
//!
//! - [`parameters`]: Descriptors, table, registry, precision land group and
//!   snapshot format

#![no_std]

pub mod parameters;
