//! llms.txt rendering and output.
//!
//! Layout (see <https://llmstxt.org/#format>):
//! ```text
//! # Title
//!
//! > Description, every line quoted
//!
//! Details, verbatim
//!
//! ## Section
//!
//! - [Link](https://url): optional description
//! ```

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use llmsgen_shared::{
    HeaderSection, LLMS_TXT_FILENAME, LinkSection, LlmsGenError, Result, Section, SectionList,
};

use crate::fs::FileSystem;
use crate::router::OutputRouter;

/// Render sections to llms.txt text, with no leading or trailing whitespace.
pub fn render_llms_txt(sections: &SectionList) -> String {
    sections
        .iter()
        .map(render_section)
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

fn render_section(section: Section<'_>) -> String {
    match section {
        Section::Header(header) => render_header(header),
        Section::Links(links) => render_links(links),
    }
}

fn render_header(header: &HeaderSection) -> String {
    let mut md = format!("# {}", header.title);

    if let Some(description) = non_empty(header.description.as_deref()) {
        md.push_str("\n\n> ");
        md.push_str(&description.split('\n').collect::<Vec<_>>().join("\n> "));
    }
    if let Some(details) = non_empty(header.details.as_deref()) {
        md.push_str("\n\n");
        md.push_str(details);
    }

    md
}

fn render_links(section: &LinkSection) -> String {
    let mut md = format!("## {}", section.title);

    if !section.links.is_empty() {
        let items = section
            .links
            .iter()
            .map(|link| match non_empty(link.description.as_deref()) {
                Some(description) => format!("- [{}]({}): {description}", link.title, link.url),
                None => format!("- [{}]({})", link.title, link.url),
            })
            .collect::<Vec<_>>()
            .join("\n");
        md.push_str("\n\n");
        md.push_str(&items);
    }

    md
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Render and write llms.txt wherever the router sends [`LLMS_TXT_FILENAME`].
///
/// Returns the written path, or `None` when the router skips it.
#[instrument(skip_all, fields(sections = sections.sections.len() + 1))]
pub fn generate_llms_txt(
    sections: &SectionList,
    router: &dyn OutputRouter,
    fs: &dyn FileSystem,
) -> Result<Option<PathBuf>> {
    let Some(target) = router.route(LLMS_TXT_FILENAME) else {
        debug!("router skipped llms.txt");
        return Ok(None);
    };

    let text = render_llms_txt(sections);

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent).map_err(|e| LlmsGenError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs.write(&target, &text).map_err(|e| LlmsGenError::Write {
        path: target.clone(),
        source: e,
    })?;

    info!(path = %target.display(), bytes = text.len(), "wrote llms.txt");
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::fs::{FsCall, MemoryFs};
    use llmsgen_shared::Link;

    fn sections() -> SectionList {
        SectionList {
            header: HeaderSection {
                title: "Test".into(),
                description: Some("Test description".into()),
                details: Some("Test details".into()),
            },
            sections: vec![
                LinkSection {
                    title: "Second test".into(),
                    links: vec![Link {
                        title: "Test link".into(),
                        url: "https://test.com".into(),
                        description: Some("Test link description".into()),
                    }],
                },
                LinkSection {
                    title: "Third test".into(),
                    links: vec![Link {
                        title: "Third test link".into(),
                        url: "https://third.test.com".into(),
                        description: None,
                    }],
                },
            ],
        }
    }

    fn out_router(id: &str) -> Option<PathBuf> {
        Some(PathBuf::from(format!("/out/{id}")))
    }

    #[test]
    fn renders_full_document() {
        let expected = "\
# Test

> Test description

Test details

## Second test

- [Test link](https://test.com): Test link description

## Third test

- [Third test link](https://third.test.com)";
        assert_eq!(render_llms_txt(&sections()), expected);
    }

    #[test]
    fn header_only() {
        let list = SectionList::new(HeaderSection::new("Solo"));
        assert_eq!(render_llms_txt(&list), "# Solo");
    }

    #[test]
    fn multiline_description_is_quoted_per_line() {
        let mut header = HeaderSection::new("T");
        header.description = Some("line one\nline two".into());
        let out = render_llms_txt(&SectionList::new(header));
        assert_eq!(out, "# T\n\n> line one\n> line two");
    }

    #[test]
    fn empty_fields_are_omitted() {
        let mut header = HeaderSection::new("T");
        header.description = Some(String::new());
        header.details = Some(String::new());
        let list = SectionList::new(header).with_section(LinkSection {
            title: "S".into(),
            links: vec![Link {
                title: "L".into(),
                url: "u".into(),
                description: Some(String::new()),
            }],
        });
        assert_eq!(render_llms_txt(&list), "# T\n\n## S\n\n- [L](u)");
    }

    #[test]
    fn empty_link_section_renders_heading_only() {
        let list = SectionList::new(HeaderSection::new("T"))
            .with_section(LinkSection {
                title: "Empty".into(),
                links: vec![],
            })
            .with_section(LinkSection {
                title: "Next".into(),
                links: vec![],
            });
        assert_eq!(render_llms_txt(&list), "# T\n\n## Empty\n\n## Next");
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        let mut header = HeaderSection::new("T");
        header.details = Some("details\n\n  ".into());
        assert_eq!(render_llms_txt(&SectionList::new(header)), "# T\n\ndetails");
    }

    #[test]
    fn writes_to_routed_path() {
        let fs = MemoryFs::new();
        let written = generate_llms_txt(&sections(), &out_router, &fs).unwrap();

        assert_eq!(written, Some(PathBuf::from("/out/llms.txt")));
        assert!(fs.has_dir("/out"));
        let writes = fs.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, Path::new("/out/llms.txt"));
        assert!(writes[0].1.starts_with("# Test"));
    }

    #[test]
    fn skipped_when_router_returns_none() {
        let fs = MemoryFs::new();
        let router = |id: &str| (id != LLMS_TXT_FILENAME).then(|| PathBuf::from(id));

        let written = generate_llms_txt(&sections(), &router, &fs).unwrap();
        assert_eq!(written, None);
        assert!(fs.calls().is_empty());
    }

    #[test]
    fn bare_filename_skips_dir_creation() {
        let fs = MemoryFs::new();
        let router = |id: &str| Some(PathBuf::from(id));

        generate_llms_txt(&sections(), &router, &fs).unwrap();
        assert!(matches!(fs.calls().as_slice(), [FsCall::Write { .. }]));
    }

    #[test]
    fn write_failure_is_write_error() {
        let fs = MemoryFs::new().deny_writes("/out");
        let err = generate_llms_txt(&sections(), &out_router, &fs).unwrap_err();
        assert!(matches!(err, LlmsGenError::Write { .. }));
    }
}
