//! General-purpose utilities shared by engine and content code

pub mod math;
pub mod vector;

pub use vector::{GrowableArray, IntoIter, DestructPolicy, Destruct, NoDestruct};
