// Public API surface of the bindings module.
pub mod action_key;
pub mod action_keys;
pub mod bind;
pub mod load;
pub mod save;

// Token tables; public because the CLI lists them.
pub mod bind_tokens;

// Internal helpers (available within the crate)
pub(crate) mod str_intern;
