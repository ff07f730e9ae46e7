pub mod blame;
pub mod report;
pub mod table;
