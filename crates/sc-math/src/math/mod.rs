//! Core math modules.

pub mod logistic;
pub mod stable;
pub mod vector;
