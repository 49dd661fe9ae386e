pub mod ingredients;
pub mod matches;
pub mod recipes;
pub mod tags;
