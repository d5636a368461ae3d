#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod switch;
pub mod util;

#[cfg(test)]
mod test_utils;
