//! Integration tests for folio outline and TODO views

mod cli_contracts;
mod outline_create;
mod outline_moves;
mod outline_remove;
mod outline_reorder;
mod provider_lifecycle;
mod session_changes;
mod support;
