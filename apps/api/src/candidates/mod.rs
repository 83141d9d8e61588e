// Candidate records: list, dashboard lanes, add (optionally with a first
// scheduled round), detail view, edit, delete.

pub mod handlers;
pub mod service;
