use hashbrown::HashMap;

/// Contact address mapped to positions in the insertion-ordered record list.
/// Positions stay valid because the active log is append-only between resets.
pub type ContactIndex = HashMap<String, Vec<usize>>;
