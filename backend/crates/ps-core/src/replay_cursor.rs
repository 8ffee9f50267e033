/// Where a newly attached subscriber wants history replayed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayCursor {
    /// Messages with an id greater than this one
    AfterId(u64),
    /// Messages published after the `(time, tag)` position
    Since { time: i64, tag: u32 },
    /// The newest `n` messages
    Backtrack(usize),
}
