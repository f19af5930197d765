pub mod answer;
pub mod console;
