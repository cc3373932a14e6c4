//! Business services for the token lifecycle

pub mod token;

pub use token::*;
