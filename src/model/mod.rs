pub mod contact;
pub mod ids;

// Re-exports for convenience
pub use contact::{
    Contact, ContactDraft, ContactMethod, MethodDraft, MethodKind, DEFAULT_METHOD_LABEL,
};
pub use ids::Id;
