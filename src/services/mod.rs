pub mod moods;
pub mod recommendations;
pub mod uploads;
