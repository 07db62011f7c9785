//! Core domain types for content rewriting and llms.txt generation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Reserved document id the router is asked about for the aggregate index.
pub const LLMS_TXT_FILENAME: &str = "llms.txt";

/// Frontmatter metadata parsed from a document's leading YAML block.
///
/// Key order follows the source document so rewritten output is stable.
pub type Metadata = serde_yaml::Mapping;

// ---------------------------------------------------------------------------
// ContentDescriptor
// ---------------------------------------------------------------------------

/// Identifies one source document to rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDescriptor {
    /// Path of the source file, as given by the caller.
    pub path: PathBuf,
}

impl ContentDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The logical id handed to the output router.
    pub fn id(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl From<&str> for ContentDescriptor {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// The mandatory first section of an llms.txt document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSection {
    /// Project or site name, rendered as the H1.
    pub title: String,
    /// Short summary, rendered as a blockquote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free text rendered verbatim after the summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HeaderSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            details: None,
        }
    }
}

/// A single entry in a link section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A titled group of links, rendered as an H2 followed by a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSection {
    pub title: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Ordered sections of an llms.txt document.
///
/// The header is a separate field, so a list without a header cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionList {
    pub header: HeaderSection,
    #[serde(default)]
    pub sections: Vec<LinkSection>,
}

/// One section of a [`SectionList`], in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
    Header(&'a HeaderSection),
    Links(&'a LinkSection),
}

impl SectionList {
    pub fn new(header: HeaderSection) -> Self {
        Self {
            header,
            sections: Vec::new(),
        }
    }

    /// Append a link section, keeping insertion order.
    pub fn with_section(mut self, section: LinkSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Iterate the header followed by every link section.
    pub fn iter(&self) -> impl Iterator<Item = Section<'_>> {
        std::iter::once(Section::Header(&self.header))
            .chain(self.sections.iter().map(Section::Links))
    }
}

impl Default for SectionList {
    fn default() -> Self {
        Self::new(HeaderSection::new("Documentation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_list_iterates_header_first() {
        let list = SectionList::new(HeaderSection::new("Home"))
            .with_section(LinkSection {
                title: "Docs".into(),
                links: vec![],
            })
            .with_section(LinkSection {
                title: "Optional".into(),
                links: vec![],
            });

        let titles: Vec<&str> = list
            .iter()
            .map(|s| match s {
                Section::Header(h) => h.title.as_str(),
                Section::Links(l) => l.title.as_str(),
            })
            .collect();
        assert_eq!(titles, ["Home", "Docs", "Optional"]);
        assert!(matches!(list.iter().next(), Some(Section::Header(_))));
    }

    #[test]
    fn section_list_deserializes_from_toml() {
        let toml_str = r#"
[header]
title = "Test"
description = "Test description"

[[sections]]
title = "Second test"
links = [{ title = "Test link", url = "https://test.com" }]

[[sections]]
title = "Empty"
"#;
        let list: SectionList = toml::from_str(toml_str).expect("parse");
        assert_eq!(list.header.description.as_deref(), Some("Test description"));
        assert_eq!(list.header.details, None);
        assert_eq!(list.sections.len(), 2);
        assert_eq!(list.sections[0].links[0].description, None);
        assert!(list.sections[1].links.is_empty());
    }

    #[test]
    fn content_descriptor_id_is_path_text() {
        let desc = ContentDescriptor::from("docs/guide/intro.mdx");
        assert_eq!(desc.id(), "docs/guide/intro.mdx");
    }
}
