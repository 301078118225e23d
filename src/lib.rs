// Calendar math, recurrence and state transitions; no I/O
pub mod date;
pub mod logic;
pub mod models;
pub mod recurrence;

// Collaborators: clock, JSON file storage, config
pub mod clock;
pub mod config;
pub mod store;

// HTTP surface
pub mod routes_goals;
pub mod routes_tasks;
pub mod routes_today;
pub mod server;
