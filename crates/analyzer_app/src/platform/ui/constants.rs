pub const PROMPT: &str = "analyzer> ";
/// Rows printed per render; the rest is summarised.
pub const MAX_ROWS: usize = 50;
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";
