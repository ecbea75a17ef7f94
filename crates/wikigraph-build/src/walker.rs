//! Docs directory traversal.
//!
//! Turns a docs tree into [`Page`] descriptors: source path, title, URL and
//! text, in the order the builder expects.

use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::{debug, warn};
use wikigraph_core::{WikigraphConfig, WikigraphError};

use crate::builder::Page;

/// Characters escaped in a URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Title of the index page at the docs root.
const HOME_TITLE: &str = "Home";

/// Walk the configured docs directory, respecting `.gitignore`, and return
/// one [`Page`] per document.
///
/// Only files with a configured extension are read; paths matching an
/// `exclude` glob are skipped. Within a directory the index page comes
/// first, the rest follow by path. Unreadable files are skipped with a
/// warning.
///
/// # Errors
///
/// Returns [`WikigraphError::FileNotFound`] if the docs directory does not
/// exist, or [`WikigraphError::Pattern`] if an exclude glob is invalid.
///
/// # Examples
///
/// ```no_run
/// use wikigraph_build::walker::walk_docs;
/// use wikigraph_core::WikigraphConfig;
///
/// let pages = walk_docs(&WikigraphConfig::default()).unwrap();
/// for page in &pages {
///     println!("{} -> {}", page.src_uri, page.abs_url);
/// }
/// ```
pub fn walk_docs(config: &WikigraphConfig) -> Result<Vec<Page>, WikigraphError> {
    let root = config.site.docs_dir.as_path();
    if !root.is_dir() {
        return Err(WikigraphError::FileNotFound(root.to_path_buf()));
    }
    let excludes = config
        .graph
        .exclude
        .iter()
        .map(|p| glob::Pattern::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut pages = Vec::new();
    for entry in ignore::WalkBuilder::new(root).build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !config.graph.extensions.iter().any(|known| known == ext) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let src_uri = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if excludes.iter().any(|p| p.matches(&src_uri)) {
            debug!(path = %src_uri, "excluded");
            continue;
        }

        let markdown = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), "skipping unreadable document: {err}");
                continue;
            }
        };

        pages.push(make_page(
            &src_uri,
            relative,
            markdown,
            &config.site.base_url,
            config.site.use_directory_urls,
        ));
    }

    pages.sort_by(|a, b| {
        crate::paths::dirname(&a.src_uri)
            .cmp(crate::paths::dirname(&b.src_uri))
            .then(b.is_index.cmp(&a.is_index))
            .then_with(|| a.src_uri.cmp(&b.src_uri))
    });
    Ok(pages)
}

fn make_page(
    src_uri: &str,
    relative: &Path,
    markdown: String,
    base_url: &str,
    use_directory_urls: bool,
) -> Page {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let is_index = is_index_stem(&stem);
    let parent = relative
        .parent()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();

    let title = heading_title(&markdown)
        .or_else(|| front_matter_title(&markdown))
        .unwrap_or_else(|| stem_title(&stem, &parent, is_index));

    let abs_url = page_url(base_url, &parent, &stem, is_index, use_directory_urls);

    Page {
        src_uri: src_uri.to_string(),
        title,
        abs_url,
        markdown,
        is_index,
    }
}

fn is_index_stem(stem: &str) -> bool {
    stem == "index" || stem.eq_ignore_ascii_case("readme")
}

/// Text of the first `# ` heading outside front matter.
fn heading_title(markdown: &str) -> Option<String> {
    body(markdown)
        .lines()
        .filter_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().trim_end_matches('#').trim())
        .find(|title| !title.is_empty())
        .map(str::to_string)
}

/// `title:` from a leading `---` front-matter block.
fn front_matter_title(markdown: &str) -> Option<String> {
    let (front, _) = split_front_matter(markdown)?;
    front.lines().find_map(|line| {
        let value = line.strip_prefix("title:")?.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn body(markdown: &str) -> &str {
    split_front_matter(markdown).map_or(markdown, |(_, rest)| rest)
}

fn split_front_matter(markdown: &str) -> Option<(&str, &str)> {
    let rest = markdown
        .strip_prefix("---\n")
        .or_else(|| markdown.strip_prefix("---\r\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn stem_title(stem: &str, parent: &str, is_index: bool) -> String {
    let name = if is_index {
        match parent.rsplit('/').next() {
            Some(dir) if !dir.is_empty() => dir,
            _ => return HOME_TITLE.to_string(),
        }
    } else {
        stem
    };
    let spaced = name.replace(['-', '_'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

fn page_url(
    base_url: &str,
    parent: &str,
    stem: &str,
    is_index: bool,
    use_directory_urls: bool,
) -> String {
    let mut segments: Vec<String> = parent
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| utf8_percent_encode(s, SEGMENT).to_string())
        .collect();
    let file = utf8_percent_encode(stem, SEGMENT).to_string();

    let tail = if use_directory_urls {
        if !is_index {
            segments.push(file);
        }
        let mut path = segments.join("/");
        if !path.is_empty() {
            path.push('/');
        }
        path
    } else {
        segments.push(format!("{file}.html"));
        segments.join("/")
    };
    format!("{}/{tail}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_for(root: &Path) -> WikigraphConfig {
        let mut config = WikigraphConfig::default();
        config.site.docs_dir = root.to_path_buf();
        config
    }

    fn make_docs() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("cs/algo")).unwrap();
        fs::write(root.join("index.md"), "Welcome. See [[cs]].").unwrap();
        fs::write(root.join("cs/index.md"), "# Computer Science\n").unwrap();
        fs::write(root.join("cs/algo/quick-sort.md"), "Fast. [[index]]").unwrap();
        fs::write(root.join("cs/algo/heap.md"), "---\ntitle: \"Heaps\"\n---\nbody").unwrap();
        fs::write(root.join("notes.txt"), "not a document").unwrap();
        dir
    }

    #[test]
    fn walk_finds_documents_only() {
        let dir = make_docs();
        let pages = walk_docs(&config_for(dir.path())).unwrap();
        let uris: Vec<&str> = pages.iter().map(|p| p.src_uri.as_str()).collect();
        assert_eq!(
            uris,
            vec!["index.md", "cs/index.md", "cs/algo/heap.md", "cs/algo/quick-sort.md"]
        );
    }

    #[test]
    fn titles_and_urls() {
        let dir = make_docs();
        let pages = walk_docs(&config_for(dir.path())).unwrap();
        let by_uri = |uri: &str| pages.iter().find(|p| p.src_uri == uri).unwrap();

        let home = by_uri("index.md");
        assert_eq!(home.title, "Home");
        assert_eq!(home.abs_url, "/");
        assert!(home.is_index);

        let cs = by_uri("cs/index.md");
        assert_eq!(cs.title, "Computer Science");
        assert_eq!(cs.abs_url, "/cs/");

        let heap = by_uri("cs/algo/heap.md");
        assert_eq!(heap.title, "Heaps");
        assert_eq!(heap.abs_url, "/cs/algo/heap/");

        let sort = by_uri("cs/algo/quick-sort.md");
        assert_eq!(sort.title, "Quick sort");
        assert_eq!(sort.markdown, "Fast. [[index]]");
    }

    #[test]
    fn file_style_urls() {
        let dir = make_docs();
        let mut config = config_for(dir.path());
        config.site.use_directory_urls = false;
        config.site.base_url = "/wiki/".into();
        let pages = walk_docs(&config).unwrap();
        let urls: Vec<&str> = pages.iter().map(|p| p.abs_url.as_str()).collect();
        assert!(urls.contains(&"/wiki/index.html"));
        assert!(urls.contains(&"/wiki/cs/index.html"));
        assert!(urls.contains(&"/wiki/cs/algo/heap.html"));
    }

    #[test]
    fn excludes_and_gitignore_are_respected() {
        let dir = make_docs();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("drafts")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("drafts/wip.md"), "wip").unwrap();
        fs::write(root.join("build/out.md"), "generated").unwrap();
        fs::write(root.join(".gitignore"), "build/\n").unwrap();

        let mut config = config_for(root);
        config.graph.exclude = vec!["drafts/*".into()];
        let pages = walk_docs(&config).unwrap();
        assert!(pages
            .iter()
            .all(|p| !p.src_uri.starts_with("drafts") && !p.src_uri.starts_with("build")));
        assert_eq!(pages.len(), 4);
    }

    #[test]
    fn readme_counts_as_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("guides")).unwrap();
        fs::write(dir.path().join("guides/README.md"), "intro").unwrap();
        let pages = walk_docs(&config_for(dir.path())).unwrap();
        assert!(pages[0].is_index);
        assert_eq!(pages[0].title, "Guides");
        assert_eq!(pages[0].abs_url, "/guides/");
    }

    #[test]
    fn missing_docs_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("absent"));
        assert!(matches!(
            walk_docs(&config),
            Err(WikigraphError::FileNotFound(_))
        ));
    }

    #[test]
    fn invalid_exclude_pattern_is_an_error() {
        let dir = make_docs();
        let mut config = config_for(dir.path());
        config.graph.exclude = vec!["[".into()];
        assert!(matches!(walk_docs(&config), Err(WikigraphError::Pattern(_))));
    }

    #[test]
    fn non_utf8_document_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.md"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(dir.path().join("good.md"), "ok").unwrap();
        let pages = walk_docs(&config_for(dir.path())).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].src_uri, "good.md");
    }

    #[test]
    fn urls_are_percent_encoded() {
        assert_eq!(
            page_url("/", "my notes", "Big Idea", false, true),
            "/my%20notes/Big%20Idea/"
        );
    }

    #[test]
    fn heading_inside_front_matter_is_ignored() {
        let text = "---\n# not a heading\ntitle: Real\n---\ntext";
        assert_eq!(heading_title(text), None);
        assert_eq!(front_matter_title(text).as_deref(), Some("Real"));
    }

    #[test]
    fn closing_hashes_are_trimmed() {
        assert_eq!(heading_title("intro\n# Title ##\n").as_deref(), Some("Title"));
    }
}
