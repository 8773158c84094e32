/// Primary keys of persisted farm records (BIGSERIAL in the relational store).
pub type DbId = i64;
