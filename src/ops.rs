//! Operator implementations. Every operator is reached through
//! [`ObservableExt`](crate::observable::ObservableExt); the types here are
//! what those methods return.
pub mod catch;
pub mod combine_latest;
pub mod debug;
pub mod delay;
pub mod distinct_until_changed;
pub mod element_at;
pub mod enumerate;
pub mod filter;
pub mod into_future;
pub mod into_stream;
pub mod map;
pub mod merge_all;
pub mod observe_on;
pub mod reduce;
pub mod retry;
pub mod scan;
pub mod single;
pub mod skip;
pub mod skip_until;
pub mod skip_while;
pub mod start_with;
pub mod subscribe_on;
pub mod switch_on_next;
pub mod take;
pub mod take_last;
pub mod take_until;
pub mod take_while;
pub mod tap;
pub mod with_latest_from;
pub mod zip;
