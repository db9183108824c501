mod lexer;
mod optimize;
mod reformat;
mod repair;

pub use lexer::{map_code, map_comments, segments, Segment, SegmentKind};
pub use optimize::{
    normalize_whitespace, optimize_whitespace, prenormalize, protect_comments, restore_comments,
    strip_comments, COMMENT_CLOSE, COMMENT_OPEN,
};
pub use reformat::reformat;
pub use repair::{CommentGlossary, LiteralPatch, RegexRepair, RepairPass, RepairRule};
