//! Unit tests for the token lifecycle module

mod mocks;

mod sweeper_tests;
