//! Plain data row types written by output backends.

/// One emitted velocity command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRow {
    /// Sequence number of the update that produced the command.
    pub seq:            u64,
    /// Agent whose pose report triggered the update.
    pub source:         u32,
    pub agent:          u32,
    pub name:           String,
    /// `"CLEAR"` or `"CONFLICT"`.
    pub mode:           &'static str,
    pub x:              f64,
    pub y:              f64,
    pub heading:        f64,
    /// Pose the current one replaced.  `None` until the second report.
    pub prev_x:         Option<f64>,
    pub prev_y:         Option<f64>,
    pub prev_heading:   Option<f64>,
    pub linear_speed:   f64,
    pub angular_speed:  f64,
    /// `true` if the command came from conflict resolution rather than
    /// steering.
    pub resolved:       bool,
}

/// One pair closer than the threshold at a given update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictRow {
    pub seq:      u64,
    pub agent_a:  u32,
    pub agent_b:  u32,
    pub distance: f64,
}
