//! Domain events handed to downstream collaborators

mod reaction_event;

pub use reaction_event::ReactionEvent;
