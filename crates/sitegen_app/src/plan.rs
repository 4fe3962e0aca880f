//! Human-readable listing of what a build would produce.

use std::fmt::Write;

use sitegen_core::{AssetRegistry, PageRegistry};

use crate::config::SiteConfig;

pub fn render(config: &SiteConfig, pages: &PageRegistry, assets: &AssetRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Application: {}", config.app_url);
    let _ = writeln!(out, "Output:      {}", config.output_dir.display());
    if let Some(base) = &config.base_url {
        let _ = writeln!(out, "Base URL:    {base}");
    }

    let _ = writeln!(out, "\nPages ({}):", pages.len());
    for page in pages.pages() {
        let kind = if page.is_binary { " binary" } else { "" };
        let _ = write!(
            out,
            "  [{:?}{kind}] {} -> {}",
            page.priority,
            page.url,
            page.output_key()
        );
        if let Some(title) = page.metadata.as_ref().and_then(|m| m.title.as_deref()) {
            let _ = write!(out, " \"{title}\"");
        }
        out.push('\n');
    }
    if pages.duplicates() > 0 {
        let _ = writeln!(out, "  ({} duplicate output file(s) dropped)", pages.duplicates());
    }

    let _ = writeln!(out, "\nCopy ({}):", assets.copies().len());
    for entry in assets.copies() {
        let target = entry.target_key();
        let target = if target.is_empty() { "." } else { target.as_str() };
        let _ = write!(out, "  {} -> {target}", entry.source_path.display());
        if !entry.excluded_extensions.is_empty() {
            let _ = write!(out, " (excluding {})", entry.excluded_extensions.join(", "));
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\nCreate ({}):", assets.creates().len());
    for entry in assets.creates() {
        let _ = writeln!(out, "  {} ({} bytes)", entry.target_key(), entry.bytes.len());
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[tokio::test]
    async fn plan_lists_pages_copies_and_created_files() {
        let config = SiteConfig::from_ron(
            r#"(
                pages: [
                    (url: "/", output_file: "/index.html", metadata: Some((title: Some("Home")))),
                    (url: "/again", output_file: "index.html"),
                    (url: "/logo.png", output_file: "logo.png", binary: true),
                ],
                asset_dirs: ["wwwroot"],
                copy: [(source: "static", target: "static", exclude_extensions: ["psd"])],
                create: [(target: "search.json", content: "[]")],
                routes: ["/styles.css"],
            )"#,
            Path::new("site.ron"),
        )
        .unwrap();
        let generator = config.build_generator();
        let pages = generator.collect_pages().await.unwrap();
        let assets = generator.collect_assets().await.unwrap();

        let text = render(&config, &pages, &assets);

        assert!(text.contains("Pages (3):"), "{text}");
        assert!(text.contains("[Normal] / -> index.html \"Home\""), "{text}");
        assert!(text.contains("[Normal binary] /logo.png -> logo.png"), "{text}");
        assert!(text.contains("[MustBeLast] /styles.css -> styles.css"), "{text}");
        assert!(text.contains("(1 duplicate output file(s) dropped)"), "{text}");
        assert!(text.contains("wwwroot -> ."), "{text}");
        assert!(text.contains("static -> static (excluding psd)"), "{text}");
        assert!(text.contains("search.json (2 bytes)"), "{text}");
    }
}
