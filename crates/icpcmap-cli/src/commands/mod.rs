pub mod matching;
pub mod resolve;
pub mod search;
pub mod suggest;
