//! Storage backends for health goals, food logs and notes.
//!
//! - [`LocalStore`]: process memory, always available
//! - [`SupabaseStore`]: remote PostgREST tables, available when configured
//! - [`StoreSelector`]: picks one of the two for every call
//!   ([`BackendSelector`] for health records, [`NoteSelector`] for notes)

pub mod local;
pub mod supabase;
pub mod selector;

pub use local::LocalStore;
pub use supabase::SupabaseStore;
pub use selector::{BackendSelector, NoteSelector, StoreSelector};
