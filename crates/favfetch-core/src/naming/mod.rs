//! Local file naming for downloaded icons.
//!
//! A title maps to a file stem by lowercasing it and collapsing each run of
//! whitespace into a single `-`. The stem plus extension names the file in the
//! icon directory; the public prefix plus file name is what gets written back
//! into the bookmark item.

mod sanitize;

pub use sanitize::sanitize_stem;

/// Stem used when a title yields nothing usable.
const DEFAULT_STEM: &str = "icon";

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Derives the file stem for an item title.
///
/// # Examples
///
/// - `icon_file_stem("Binance")` → `"binance"`
/// - `icon_file_stem("Coin  Market\tCap")` → `"coin-market-cap"`
pub fn icon_file_stem(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.extend(c.to_lowercase());
            in_space = false;
        }
    }
    let stem = sanitize_stem(&out);
    if stem.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        stem
    }
}

/// Naming rules for one run: file extension and the public path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconNaming {
    extension: String,
    public_prefix: String,
}

impl Default for IconNaming {
    fn default() -> Self {
        Self::new("ico", "./assets/icons")
    }
}

impl IconNaming {
    pub fn new(extension: &str, public_prefix: &str) -> Self {
        Self {
            extension: extension.trim().trim_start_matches('.').to_string(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// File name for a stem: `<stem>.<ext>`, truncated to fit NAME_MAX.
    pub fn file_name(&self, stem: &str) -> String {
        let stem = sanitize_stem(stem);
        let stem = match stem.as_str() {
            "" | "." | ".." => DEFAULT_STEM,
            s => s,
        };
        if self.extension.is_empty() {
            return truncate(stem, NAME_MAX).to_string();
        }
        let budget = NAME_MAX.saturating_sub(self.extension.len() + 1);
        format!("{}.{}", truncate(stem, budget), self.extension)
    }

    /// Relative path written into the bookmark item for a saved file.
    pub fn relative_path(&self, file_name: &str) -> String {
        if self.public_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.public_prefix, file_name)
        }
    }

    /// `(file_name, relative_path)` for an item title.
    pub fn for_title(&self, title: &str) -> (String, String) {
        let file_name = self.file_name(&icon_file_stem(title));
        let rel = self.relative_path(&file_name);
        (file_name, rel)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
