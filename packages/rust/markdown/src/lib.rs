//! Frontmatter handling and body transforms for Markdown/MDX content.
//!
//! - [`frontmatter`] locates, parses, strips, and re-renders the leading YAML block
//! - [`transform`] defines the [`Transform`] capability and the ordered [`TransformChain`]
//! - [`passes`] holds the built-in transforms and [`build_chain`] for configured chains

pub mod frontmatter;
pub mod passes;
pub mod transform;

pub use frontmatter::{FrontmatterFilter, compose, extract, replace, strip};
pub use passes::{
    CollapseBlankLines, NormalizeMarkdown, RegexReplace, ReplaceText, ShiftHeadings,
    TitleHeading, TrailingNewline, build_chain,
};
pub use transform::{FnTransform, Transform, TransformChain, TransformContext, transform_fn};
