pub mod user_id;
pub mod vote_record;
