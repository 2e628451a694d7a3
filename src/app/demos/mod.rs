pub mod calculator_demo;
pub mod property_demo;
pub mod race_demo;
