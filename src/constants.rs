// Centralized queue tuning constants

/// Initial capacity for the visible toast vector
pub(crate) const INITIAL_VISIBLE_CAPACITY: usize = 8;

/// Prefix for engine-generated toast identifiers
pub(crate) const GENERATED_ID_PREFIX: &str = "toast-";
