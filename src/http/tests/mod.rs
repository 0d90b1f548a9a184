//! Unit tests for the HTTP boundary.
