pub mod check;
pub mod rows;
