pub mod report;
pub mod sales;
