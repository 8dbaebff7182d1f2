//! Small, dependency-free helpers shared by the models and the codecs.

pub mod units;
