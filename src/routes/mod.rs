/// Router Module Index
///
/// Splits the HTTP surface into the JSON API used by the client-rendered front
/// end and the guarded page routes generated from the route table.

/// Routes accessible to every client: health check, route table, guard evaluation.
pub mod public;

/// Page routes, one per route-table entry, each evaluated by the guard.
pub mod pages;
