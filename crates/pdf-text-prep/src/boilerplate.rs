use std::collections::{BTreeSet, HashMap, HashSet};

use crate::options::DEFAULT_BOILERPLATE_PERCENT;

/// Number of distinct pages each trimmed, non-empty line appears on.
///
/// A line repeated on one page counts once for that page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineFrequencyTable {
    counts: HashMap<String, usize>,
    page_count: usize,
}

impl LineFrequencyTable {
    #[must_use]
    pub fn from_pages<S: AsRef<str>>(pages: &[S]) -> Self {
        let mut counts = HashMap::new();
        for page in pages {
            let distinct = page
                .as_ref()
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<HashSet<_>>();
            for line in distinct {
                *counts.entry(line.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            counts,
            page_count: pages.len(),
        }
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub fn pages_containing(&self, line: &str) -> usize {
        self.counts.get(line.trim()).copied().unwrap_or(0)
    }

    /// Lines present on at least `threshold` pages.
    #[must_use]
    pub fn lines_at_or_above(&self, threshold: usize) -> HashSet<String> {
        self.counts
            .iter()
            .filter(|(_, count)| **count >= threshold)
            .map(|(line, _)| line.clone())
            .collect()
    }
}

/// `ceil(page_count * percent / 100)` in exact integer arithmetic.
#[must_use]
pub fn boilerplate_threshold(page_count: usize, percent: u8) -> usize {
    (page_count * usize::from(percent)).div_ceil(100)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReport {
    pub pages: Vec<String>,
    /// Boilerplate lines that were stripped, sorted for stable output.
    pub removed_lines: Vec<String>,
    pub threshold: usize,
}

/// Strips running headers, footers and other lines recurring on at least 70%
/// of pages. Output has the same length and order as the input.
///
/// A single page is its own 100%, so every non-blank line of a one-page
/// document is removed.
#[must_use]
pub fn filter_boilerplate<S: AsRef<str>>(pages: &[S]) -> Vec<String> {
    filter_boilerplate_with_report(pages, DEFAULT_BOILERPLATE_PERCENT).pages
}

#[must_use]
pub fn filter_boilerplate_with_report<S: AsRef<str>>(pages: &[S], percent: u8) -> FilterReport {
    let table = LineFrequencyTable::from_pages(pages);
    let threshold = boilerplate_threshold(table.page_count(), percent);
    let boilerplate = table.lines_at_or_above(threshold);

    let pages = pages
        .iter()
        .map(|page| strip_lines(page.as_ref(), &boilerplate))
        .collect();

    FilterReport {
        pages,
        removed_lines: boilerplate
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        threshold,
    }
}

fn strip_lines(page: &str, boilerplate: &HashSet<String>) -> String {
    page.split('\n')
        .filter(|line| !boilerplate.contains(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
