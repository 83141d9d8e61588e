// Interview rounds: record a scored round, preview the resulting status,
// schedule an unscored round, edit, delete. Saving a score re-derives the
// candidate's pipeline status.

pub mod handlers;
pub mod service;
