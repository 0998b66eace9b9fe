use std::collections::{BTreeSet, HashSet};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use regex::{Regex, RegexBuilder};

use crate::host::{GraphNode, TargetType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Name,
    Path,
}

impl SearchMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Path => "Path",
        }
    }

    fn field(self, node: &GraphNode) -> &str {
        match self {
            Self::Name => node.display_label(),
            Self::Path => &node.source_path,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterPolicy {
    #[default]
    Dim,
    Hide,
}

impl FilterPolicy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dim => "Dim",
            Self::Hide => "Hide",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(in crate::app) enum SearchMatcher {
    #[default]
    All,
    Substring(String),
    Pattern(Regex),
}

impl SearchMatcher {
    pub(in crate::app) fn compile(query: &str) -> Self {
        if query.is_empty() {
            return Self::All;
        }

        if query.contains(['*', '(', '[']) {
            match RegexBuilder::new(query).case_insensitive(true).build() {
                Ok(pattern) => return Self::Pattern(pattern),
                Err(error) => {
                    log::debug!("search pattern {query:?} rejected, using substring match: {error}");
                }
            }
        }

        Self::Substring(query.to_lowercase())
    }

    pub(in crate::app) fn matches(&self, text: &str) -> bool {
        match self {
            Self::All => true,
            Self::Substring(needle) => text.to_lowercase().contains(needle.as_str()),
            Self::Pattern(pattern) => pattern.is_match(text),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SearchState {
    query: String,
    pub mode: SearchMode,
    pub policy: FilterPolicy,
    pub excluded_types: BTreeSet<TargetType>,
    matcher: SearchMatcher,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.matcher = SearchMatcher::compile(&self.query);
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.matcher, SearchMatcher::All)
    }

    pub fn matches_node(&self, node: &GraphNode) -> bool {
        self.matcher.matches(self.mode.field(node))
    }

    pub fn set_type_excluded(&mut self, target_type: TargetType, excluded: bool) -> bool {
        if excluded {
            self.excluded_types.insert(target_type)
        } else {
            self.excluded_types.remove(&target_type)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeVisibility {
    pub filtered: Vec<bool>,
    pub dimmed: Vec<bool>,
}

impl NodeVisibility {
    pub fn is_filtered(&self, index: usize) -> bool {
        self.filtered.get(index).copied().unwrap_or(false)
    }

    pub fn is_dimmed(&self, index: usize) -> bool {
        self.dimmed.get(index).copied().unwrap_or(false)
    }

    pub fn visible_count(&self) -> usize {
        self.filtered.iter().filter(|filtered| !**filtered).count()
    }
}

pub fn compute_visibility(
    nodes: &[GraphNode],
    search: &SearchState,
    focus_reachable: Option<&HashSet<String>>,
) -> NodeVisibility {
    let mut visibility = NodeVisibility {
        filtered: Vec::with_capacity(nodes.len()),
        dimmed: Vec::with_capacity(nodes.len()),
    };

    for node in nodes {
        let excluded = search.excluded_types.contains(&node.target_type);
        let outside_focus = focus_reachable.is_some_and(|reachable| !reachable.contains(&node.id));
        let rejected = !search.matches_node(node) || outside_focus;

        let (filtered, dimmed) = match search.policy {
            FilterPolicy::Hide => (excluded || rejected, false),
            FilterPolicy::Dim => (excluded, !excluded && rejected),
        };
        visibility.filtered.push(filtered);
        visibility.dimmed.push(dimmed);
    }

    visibility
}

pub fn ranked_matches(
    nodes: &[GraphNode],
    visibility: &NodeVisibility,
    query: &str,
    mode: SearchMode,
    limit: usize,
) -> Vec<usize> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let pattern = SearchMatcher::compile(query);
    let query = query.trim();
    let mut scored = nodes
        .iter()
        .enumerate()
        .filter(|(index, _)| !visibility.is_filtered(*index))
        .filter_map(|(index, node)| {
            let text = mode.field(node);
            let fuzzy = matcher.fuzzy_match(text, query);
            match (fuzzy, pattern.matches(text)) {
                (Some(score), _) => Some((score, index)),
                (None, true) => Some((0, index)),
                (None, false) => None,
            }
        })
        .collect::<Vec<_>>();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| nodes[a.1].display_label().cmp(nodes[b.1].display_label()))
    });
    scored.truncate(limit);
    scored.into_iter().map(|(_, index)| index).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, target_type: TargetType, path: &str) -> GraphNode {
        GraphNode {
            source_path: path.to_owned(),
            ..GraphNode::new(id, target_type)
        }
    }

    fn sample() -> Vec<GraphNode> {
        vec![
            node("app", TargetType::Executable, "/src/app/CMakeLists.txt"),
            node("core_lib", TargetType::StaticLibrary, "/src/core/CMakeLists.txt"),
            node("CoreTests", TargetType::Executable, "/tests/CMakeLists.txt"),
        ]
    }

    #[test]
    fn substring_match_ignores_case() {
        let matcher = SearchMatcher::compile("CORE");
        assert!(matcher.matches("core_lib"));
        assert!(matcher.matches("CoreTests"));
        assert!(!matcher.matches("app"));
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_query() {
        let matcher = SearchMatcher::compile(" core");
        assert!(!matcher.matches("libcore"));
        assert!(matcher.matches("lib core"));

        let mut search = SearchState::default();
        search.set_query(" ");
        assert!(search.is_active());
        assert!(!search.matches_node(&node("app", TargetType::Executable, "")));
    }

    #[test]
    fn pattern_characters_switch_to_regex() {
        let matcher = SearchMatcher::compile("^core.*lib$");
        assert!(matches!(matcher, SearchMatcher::Pattern(_)));
        assert!(matcher.matches("Core_Lib"));
        assert!(!matcher.matches("CoreTests"));
    }

    #[test]
    fn invalid_pattern_falls_back_to_substring() {
        let matcher = SearchMatcher::compile("lib(");
        assert!(matches!(matcher, SearchMatcher::Substring(_)));
        assert!(matcher.matches("my_lib(x)"));
        assert!(!matcher.matches("my_lib"));
    }

    #[test]
    fn path_mode_searches_source_paths() {
        let mut search = SearchState::default();
        search.mode = SearchMode::Path;
        search.set_query("tests/");

        let nodes = sample();
        let hits = nodes
            .iter()
            .filter(|node| search.matches_node(node))
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(hits, ["CoreTests"]);
    }

    #[test]
    fn dim_policy_keeps_rejected_nodes_in_the_simulation() {
        let mut search = SearchState::default();
        search.set_query("core");
        search.set_type_excluded(TargetType::StaticLibrary, true);

        let visibility = compute_visibility(&sample(), &search, None);
        assert_eq!(visibility.filtered, [false, true, false]);
        assert_eq!(visibility.dimmed, [true, false, false]);
    }

    #[test]
    fn hide_policy_filters_search_and_focus_rejects() {
        let mut search = SearchState::default();
        search.policy = FilterPolicy::Hide;
        search.set_query("c");
        let reachable = HashSet::from(["app".to_owned(), "core_lib".to_owned()]);

        let visibility = compute_visibility(&sample(), &search, Some(&reachable));
        // "app" fails the search, "CoreTests" sits outside the focused subgraph.
        assert_eq!(visibility.filtered, [true, false, true]);
        assert!(visibility.dimmed.iter().all(|dimmed| !dimmed));
        assert_eq!(visibility.visible_count(), 1);
    }

    #[test]
    fn ranked_matches_prefer_tighter_hits() {
        let nodes = sample();
        let visibility = compute_visibility(&nodes, &SearchState::default(), None);

        let ranked = ranked_matches(&nodes, &visibility, "core", SearchMode::Name, 10);
        assert_eq!(ranked.len(), 2);
        assert!(!ranked.contains(&0));
        assert!(ranked_matches(&nodes, &visibility, "   ", SearchMode::Name, 10).is_empty());
    }
}
