//! Domain logic for unitodo
//!
//! Pure, synchronous transformations without any I/O concerns. Every
//! function here is a mapping from inputs to outputs with no hidden state,
//! so it can be called from any thread without locking.

mod annotation;
mod ordering;
mod record;
mod status;
mod timestamp;
mod transition;

pub use annotation::{parse, IdToken, ParsedAnnotation, NANOID_LEN};
pub use ordering::{char_rank, compare, compare_content, sort_content, sort_records, FilterMode};
pub use record::{Location, ScanOutput, ScanPosition, ScannedTodo, TodoCategory, TodoRecord};
pub use status::{
    is_done_like, rank, CycleDirection, Rank, StatusConfig, StatusError, StatusStateSet,
};
pub use timestamp::{
    alphabet_index, decode, encode, Codec, TimestampToken, TokenError, ALPHABET,
    CUSTOM_EPOCH_SECS, TOKEN_LEN,
};
pub use transition::{
    mark_done, new_todo_content, transition_content, TransitionError, DEFAULT_PRIORITY,
};
