/// How many renders can be nested through `partial()` calls before giving up
pub const RENDER_MAX_DEPTH: usize = 32;
