use std::collections::BTreeMap;
use std::fmt;

/// Which attribute a broken link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkType {
    Href,
    Src,
    Srcset,
    Action,
}

impl LinkType {
    pub fn from_attribute(attribute: &str) -> Self {
        match attribute {
            "src" => LinkType::Src,
            "srcset" => LinkType::Srcset,
            "action" => LinkType::Action,
            _ => LinkType::Href,
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Href => write!(f, "href"),
            LinkType::Src => write!(f, "src"),
            LinkType::Srcset => write!(f, "srcset"),
            LinkType::Action => write!(f, "action"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    pub source_page: String,
    /// The link text exactly as written in the HTML.
    pub broken_url: String,
    pub link_type: LinkType,
    pub element: String,
}

/// Every broken link found during a run, rendered grouped by source page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokenLinkReport {
    links: Vec<BrokenLink>,
}

impl BrokenLinkReport {
    pub fn new(links: Vec<BrokenLink>) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &[BrokenLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn by_source_page(&self) -> BTreeMap<&str, Vec<&BrokenLink>> {
        let mut grouped: BTreeMap<&str, Vec<&BrokenLink>> = BTreeMap::new();
        for link in &self.links {
            grouped.entry(link.source_page.as_str()).or_default().push(link);
        }
        grouped
    }
}

impl fmt::Display for BrokenLinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouped = self.by_source_page();
        write!(
            f,
            "found {} broken link(s) on {} page(s):",
            self.links.len(),
            grouped.len()
        )?;
        for (page, links) in grouped {
            write!(f, "\n  {page}")?;
            for link in links {
                write!(
                    f,
                    "\n    <{} {}=\"{}\">",
                    link.element, link.link_type, link.broken_url
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(page: &str, url: &str) -> BrokenLink {
        BrokenLink {
            source_page: page.to_string(),
            broken_url: url.to_string(),
            link_type: LinkType::Href,
            element: "a".to_string(),
        }
    }

    #[test]
    fn display_groups_by_source_page() {
        let report = BrokenLinkReport::new(vec![
            link("/b", "/x"),
            link("/a", "/y"),
            link("/b", "/z"),
        ]);
        let text = report.to_string();
        assert!(text.starts_with("found 3 broken link(s) on 2 page(s):"));
        let a = text.find("\n  /a").unwrap();
        let b = text.find("\n  /b").unwrap();
        assert!(a < b);
        assert!(text.contains("<a href=\"/x\">"));
        assert!(text.contains("<a href=\"/z\">"));
    }
}
