//! CRM recovery verification: dynamic tolerance bands, blank selection,
//! blank/scale correction previews, and report annotations.

pub mod annotate;
pub mod blank;
pub mod preview;
pub mod tolerance;

pub use annotate::{EXCESSIVE_SCALING_PERCENT, build_annotations, scaling_advice};
pub use blank::{BlankCandidate, BlankSelection, CrmGroup, select_blank};
pub use preview::{apply_blank_scale, preview_value};
pub use tolerance::{acceptable_range, dynamic_half_width, in_range};
