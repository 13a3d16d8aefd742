mod mood;
mod movie;
mod review;

pub use mood::Mood;
pub use movie::{Movie, MovieWithRelations, NewMovie};
pub use review::Review;
