// Central place for user-facing strings and other fixed constants.
// Keep these out of the modules that use them so tweaks stay in one spot.

/// Bracket-path root marker.
pub const PATH_ROOT: &str = "$";

/// Indentation of the published document text.
pub const DEFAULT_INDENT: usize = 2;

/// Largest array index a write may pad up to (2^32 - 2, as for JS arrays).
/// Arrays are dense, so every slot below the index is allocated.
pub const MAX_ARRAY_INDEX: usize = 4_294_967_294;

/// Text of a document that has not been loaded yet.
pub const EMPTY_OBJECT_TEXT: &str = "{}";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_NAME: &str = "nodepath.config.json";

// Row type tags as the graph layer spells them.
pub const ROW_TYPE_ARRAY: &str = "array";
pub const ROW_TYPE_OBJECT: &str = "object";
pub const ROW_TYPE_SCALAR: &str = "scalar";

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_ERR_INVALID_JSON: &str = "Invalid JSON. Please fix and try again.";
pub const EN_ERR_NO_VALUE_AT: &str = "no value at";
pub const EN_LABEL_CONTENT: &str = "Content";
pub const EN_LABEL_JSON_PATH: &str = "JSON Path";
pub const EN_STATUS_SAVED: &str = "Saved";
pub const EN_STATUS_DRY_RUN: &str = "Dry run, not written:";
