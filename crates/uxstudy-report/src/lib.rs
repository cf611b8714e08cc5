//! uxstudy-report: Renderings of a study report.
//!
//! HTML for sharing (inline SVG charts, raw tables) and Markdown for pasting
//! into a write-up.

pub mod html;
pub mod markdown;
