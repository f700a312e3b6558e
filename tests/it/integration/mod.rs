//! Integration tests for glyphboard.
//!
//! These tests verify the interaction between multiple components
//! and test complete workflows end-to-end.

mod fetch_tests;
