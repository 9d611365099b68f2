//! Shared infrastructure for the translation test suite.
