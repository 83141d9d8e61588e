// Derived fields: percentage totals from score breakdowns, the hire/reject
// decision once both decision rounds are scored, and the dashboard lanes.
// Everything here is pure; handlers fetch rows and pass them in.

pub mod board;
pub mod scoring;
pub mod status;
