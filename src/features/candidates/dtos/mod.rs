mod candidate_dto;

pub use candidate_dto::*;
