//! Text matching used by search-and-highlight.

use crate::edit::HighlightRect;

/// Page that search landed on, and the areas to highlight there.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMatches {
    pub page_index: usize,
    pub rects: Vec<HighlightRect>,
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Index of the first page, in page order, whose text contains `query`.
pub fn first_matching_page<I>(pages: I, query: &str) -> Option<usize>
where
    I: IntoIterator<Item = (usize, String)>,
{
    if query.trim().is_empty() {
        return None;
    }
    pages
        .into_iter()
        .find(|(_, text)| contains_ignore_case(text, query))
        .map(|(index, _)| index)
}

/// Highlight areas for a page's matches, each match given as the bounds of
/// the text segments it covers. Segments of one match that share a line are
/// joined into a single rectangle; empty bounds are dropped.
pub fn match_rects<M, S>(matches: M) -> Vec<HighlightRect>
where
    M: IntoIterator<Item = S>,
    S: IntoIterator<Item = HighlightRect>,
{
    let mut rects = Vec::new();
    for segments in matches {
        let mut lines: Vec<HighlightRect> = Vec::new();
        for rect in segments {
            if rect.right <= rect.left || rect.top <= rect.bottom {
                continue;
            }
            match lines.iter_mut().find(|line| same_line(line, &rect)) {
                Some(line) => {
                    line.left = line.left.min(rect.left);
                    line.bottom = line.bottom.min(rect.bottom);
                    line.right = line.right.max(rect.right);
                    line.top = line.top.max(rect.top);
                }
                None => lines.push(rect),
            }
        }
        rects.extend(lines);
    }
    rects
}

/// Vertical overlap of more than half the shorter height.
fn same_line(a: &HighlightRect, b: &HighlightRect) -> bool {
    let overlap = a.top.min(b.top) - a.bottom.max(b.bottom);
    let shorter = (a.top - a.bottom).min(b.top - b.bottom);
    overlap > shorter / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<(usize, String)> {
        texts.iter().map(|t| t.to_string()).enumerate().collect()
    }

    #[test]
    fn finds_first_page_in_order() {
        let pages = pages(&["cover", "Chapter one", "chapter two"]);
        assert_eq!(first_matching_page(pages.clone(), "CHAPTER"), Some(1));
        assert_eq!(first_matching_page(pages, "appendix"), None);
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert_eq!(first_matching_page(pages(&["a"]), "  "), None);
    }

    fn rect(left: f32, bottom: f32, right: f32, top: f32) -> HighlightRect {
        HighlightRect {
            left,
            bottom,
            right,
            top,
        }
    }

    #[test]
    fn each_match_gets_its_own_rect() {
        let matches = vec![
            vec![rect(10.0, 700.0, 40.0, 712.0)],
            vec![rect(200.0, 680.0, 230.0, 692.0)],
        ];
        assert_eq!(
            match_rects(matches),
            [rect(10.0, 700.0, 40.0, 712.0), rect(200.0, 680.0, 230.0, 692.0)]
        );
    }

    #[test]
    fn segments_of_one_match_on_a_line_are_joined() {
        // "Total" set in two runs, then the match wraps onto the next line
        let matches = vec![vec![
            rect(10.0, 700.0, 25.0, 712.0),
            rect(25.0, 699.5, 40.0, 711.0),
            rect(10.0, 686.0, 30.0, 698.0),
        ]];
        assert_eq!(
            match_rects(matches),
            [rect(10.0, 699.5, 40.0, 712.0), rect(10.0, 686.0, 30.0, 698.0)]
        );
    }

    #[test]
    fn empty_bounds_are_dropped() {
        let matches = vec![vec![rect(5.0, 5.0, 5.0, 20.0)], vec![]];
        assert!(match_rects(matches).is_empty());
    }
}
