//! Integration test suite.
//!
//! Tests are organized by pipeline stage:
//! 1. Schema catalogs and record porting
//! 2. Chunk containers and resource fixups
//! 3. Shader variant matching

pub mod helpers;
pub mod porting_tests;
pub mod resource_tests;
pub mod shader_tests;
