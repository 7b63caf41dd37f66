//! sea-orm entities for the identity service.

pub mod outbox_events;
pub mod users;
