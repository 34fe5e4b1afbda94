//! HTML fragments for the audition and signal-bank pages.
//!
//! Every function here is pure: it takes fetched view models and returns the
//! markup a container should hold. All interpolated values are HTML-encoded.

pub mod format;
pub mod html;
pub mod landing;
pub mod ledger;
pub mod submissions;

pub use format::{truncate_story, Formatter};
pub use landing::{
    render_help_requests, render_landing_ledger, stat_tiles, LandingLimits, StatTiles,
};
pub use ledger::{render_ledger, LedgerView};
pub use submissions::render_submissions;
