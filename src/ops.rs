//! Operator implementations. Each operator builds, at subscribe time, a
//! new upstream observer wrapping the downstream one; single-upstream
//! state lives in that observer, fan-in state in a shared, mutex-guarded
//! cell.

pub mod box_it;
pub mod buffer_count;
pub mod combine_latest;
pub mod concat;
pub mod debounce;
pub mod delay;
pub mod distinct;
pub mod filter;
pub mod finalize;
pub mod group_by;
pub mod last;
pub mod map;
pub mod map_err;
pub mod merge;
pub mod on_error_resume_next;
pub mod sample;
pub mod scan;
pub mod share;
pub mod skip;
pub mod skip_while;
pub mod switch_on_next;
pub mod take;
pub mod take_while;
pub mod tap;
pub mod throttle;
pub mod timeout;
pub mod window_count;
pub mod with_latest_from;
pub mod zip;
