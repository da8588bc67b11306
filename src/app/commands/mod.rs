pub mod ask;
pub mod execute;
pub mod generate;
pub mod refine;
