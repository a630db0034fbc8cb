pub(crate) mod auth;
pub(crate) mod events;
pub(crate) mod health;
pub(crate) mod market;
pub(crate) mod news;
