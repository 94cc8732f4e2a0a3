mod loader_tests;
pub mod utils;
