pub mod effort;
pub mod load;
pub mod resource_rows;
pub mod week_grid;
