mod bitmatrix;

pub use bitmatrix::*;
