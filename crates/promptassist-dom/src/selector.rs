//! CSS selectors.
//!
//! Selector text is parsed with `scraper`'s selector grammar and matched
//! against the arena through the `selectors` engine, so site descriptors get
//! the same selector support a browser's `querySelectorAll` offers for
//! tree-structural queries (`:not()`, `:has()`, `:first-child`, sibling
//! combinators, attribute flags). State pseudo-classes such as `:hover` have
//! no meaning on a static page model and are rejected.

use std::fmt;
use std::str::FromStr;

use scraper::error::SelectorErrorKind;
use scraper::selector::{
    CssLocalName, CssString, NonTSPseudoClass, Parser, PseudoElement, Simple,
};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{
    self, ElementSelectorFlags, MatchingContext, MatchingForInvalidation, MatchingMode,
    NeedsSelectorFlags, QuirksMode, SelectorCaches,
};
use selectors::parser::{ParseRelative, SelectorImpl};
use selectors::{Element, OpaqueElement};
use tracing::debug;

use crate::document::Document;
use crate::dom_types::NodeId;
use crate::error::DomError;

type Namespace = <Simple as SelectorImpl>::NamespaceUrl;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone)]
pub struct SelectorList {
    source: String,
    selectors: selectors::SelectorList<Simple>,
}

impl SelectorList {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let mut parser_input = cssparser::ParserInput::new(input);
        let mut parser = cssparser::Parser::new(&mut parser_input);
        let selectors = selectors::SelectorList::parse(&Parser, &mut parser, ParseRelative::No)
            .map_err(|e| {
                let reason = SelectorErrorKind::from(e).to_string();
                debug!("Rejected selector {:?}: {}", input, reason);
                DomError::InvalidSelector {
                    selector: input.to_string(),
                    reason,
                }
            })?;
        Ok(Self {
            source: input.trim().to_string(),
            selectors,
        })
    }

    /// The selector text as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the element matches any selector in the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        ElementRef::new(doc, node)
            .is_some_and(|el| self.matches_element(&el, None, &mut SelectorCaches::default()))
    }

    /// Elements among `candidates` that match, in the given order.
    ///
    /// `scope` is the element `:scope` refers to.
    pub(crate) fn filter(
        &self,
        doc: &Document,
        scope: Option<NodeId>,
        candidates: impl IntoIterator<Item = NodeId>,
    ) -> impl Iterator<Item = NodeId> {
        let scope = scope
            .and_then(|id| ElementRef::new(doc, id))
            .map(|el| el.opaque());
        let mut caches = SelectorCaches::default();
        candidates
            .into_iter()
            .filter_map(move |id| ElementRef::new(doc, id))
            .filter(move |el| self.matches_element(el, scope, &mut caches))
            .map(|el| el.id)
    }

    fn matches_element(
        &self,
        element: &ElementRef<'_>,
        scope: Option<OpaqueElement>,
        caches: &mut SelectorCaches,
    ) -> bool {
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        context.scope_element = scope;
        self.selectors
            .slice()
            .iter()
            .any(|s| matching::matches_selector(s, 0, None, element, &mut context))
    }
}

impl PartialEq for SelectorList {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl FromStr for SelectorList {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// An element node seen through the `selectors` tree interface.
#[derive(Clone, Copy)]
struct ElementRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    fn new(doc: &'a Document, id: NodeId) -> Option<Self> {
        doc.is_element(id).then_some(Self { doc, id })
    }

    fn tag(&self) -> &'a str {
        self.doc.tag(self.id).unwrap_or_default()
    }

    fn siblings(&self) -> &'a [NodeId] {
        self.doc
            .parent(self.id)
            .map(|p| self.doc.children(p))
            .unwrap_or_default()
    }

    fn position(&self) -> Option<(usize, &'a [NodeId])> {
        let siblings = self.siblings();
        let index = siblings.iter().position(|&n| n == self.id)?;
        Some((index, siblings))
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {:?}", self.tag(), self.id)
    }
}

impl Element for ElementRef<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        self.doc.opaque(self.id)
    }

    fn parent_element(&self) -> Option<Self> {
        self.doc
            .parent(self.id)
            .and_then(|p| ElementRef::new(self.doc, p))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (index, siblings) = self.position()?;
        siblings[..index]
            .iter()
            .rev()
            .find_map(|&n| ElementRef::new(self.doc, n))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (index, siblings) = self.position()?;
        siblings[index + 1..]
            .iter()
            .find_map(|&n| ElementRef::new(self.doc, n))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.doc
            .children(self.id)
            .iter()
            .find_map(|&n| ElementRef::new(self.doc, n))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &CssLocalName) -> bool {
        &*local_name.0 == self.tag()
    }

    fn has_namespace(&self, ns: &Namespace) -> bool {
        &**ns == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&Namespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Page attributes carry no namespace.
        if let NamespaceConstraint::Specific(url) = ns {
            if !url.is_empty() {
                return false;
            }
        }
        self.doc
            .attributes(self.id)
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(&local_name.0))
            .any(|(_, value)| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.tag(), "a" | "area" | "link") && self.doc.has_attribute(self.id, "href")
    }

    fn is_html_slot_element(&self) -> bool {
        self.tag() == "slot"
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .attribute(self.id, "id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .class_list(self.id)
            .iter()
            .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
    }

    fn has_custom_state(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.doc
            .children(self.id)
            .iter()
            .all(|&c| !self.doc.is_element(c) && self.doc.text_content(c).is_empty())
    }

    fn is_root(&self) -> bool {
        self.id == self.doc.root()
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
