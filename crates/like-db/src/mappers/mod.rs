//! Model to entity mappers

mod like;
