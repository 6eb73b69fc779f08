pub mod eco_scoring;
