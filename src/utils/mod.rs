// src/utils/mod.rs
mod field;

pub(crate) use field::*;
