pub mod action;
pub mod balance;
pub mod check;
pub mod completions;
