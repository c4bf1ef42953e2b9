pub mod player;
pub mod match_result;
