//! Element locator.
//!
//! Finds chat inputs and the container each input's button goes into.
//! Container discovery is a cascade; each step runs only when the previous
//! ones found nothing, and the last step always succeeds by creating a
//! container.

use tracing::debug;

use promptassist_config::SiteDescriptor;
use promptassist_dom::{Document, DomError, NodeId, SelectorList};

use crate::error::OverlayError;

/// Attribute marking nodes the overlay created.
pub const OWNED_ATTRIBUTE: &str = "data-prompt-assist";

/// Enclosing regions searched in step 3 and watched while a container is pending.
const CHAT_AREA_SELECTOR: &str = r#"form, [role="form"], [role="textbox"], .chat-area"#;

/// Class-name keywords that suggest a button container in step 5.
const CONTAINER_KEYWORDS: [&str; 5] = ["container", "wrapper", "toolbar", "button", "actions"];

/// Hit-test offset from the input's bottom-right corner.
const HIT_TEST_DX: f64 = 24.0;
const HIT_TEST_DY: f64 = -12.0;

/// Selectors of one site descriptor, parsed once.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub inputs: Vec<SelectorList>,
    pub container: SelectorList,
}

impl SiteSelectors {
    pub fn compile(site: &SiteDescriptor) -> Result<Self, OverlayError> {
        let parse = |selector: &str| {
            SelectorList::parse(selector).map_err(|source| OverlayError::Selector {
                site: site.display_name().to_string(),
                source,
            })
        };
        let inputs = site
            .input_selectors
            .iter()
            .map(|s| parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        let container = parse(&site.button_container.selector)?;
        Ok(Self { inputs, container })
    }
}

/// Which cascade step produced a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStrategy {
    /// Nearest ancestor matching the selector.
    Ancestor,
    /// Matching descendant of the input's parent.
    Parent,
    /// Matching descendant of the enclosing chat area.
    ChatArea,
    /// Document-wide match closest to the input.
    Nearest,
    /// Hit-test near the input's bottom-right corner.
    HitTest,
    /// Created by the overlay.
    Synthesized,
}

impl ContainerStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ancestor => "ancestor",
            Self::Parent => "parent",
            Self::ChatArea => "chat-area",
            Self::Nearest => "nearest",
            Self::HitTest => "hit-test",
            Self::Synthesized => "synthesized",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHit {
    pub node: NodeId,
    pub strategy: ContainerStrategy,
}

/// Every element matching any input selector, each once, in selector order.
pub fn find_inputs(doc: &Document, selectors: &SiteSelectors) -> Vec<NodeId> {
    let mut found = Vec::new();
    for selector in &selectors.inputs {
        for node in doc.select_all(doc.root(), selector) {
            if !found.contains(&node) && !is_owned(doc, node) {
                found.push(node);
            }
        }
    }
    found
}

/// Cascade steps 1 to 5. `None` means nothing on the page fits yet.
pub fn find_existing_container(
    doc: &Document,
    input: NodeId,
    container: &SelectorList,
) -> Option<ContainerHit> {
    let usable = |node: &NodeId| *node != input && !is_owned(doc, *node);
    let hit = |node, strategy| Some(ContainerHit { node, strategy });

    // 1. Nearest ancestor.
    if let Some(node) = doc
        .ancestors(input)
        .into_iter()
        .find(|&a| doc.matches(a, container) && usable(&a))
    {
        return hit(node, ContainerStrategy::Ancestor);
    }

    // 2. Around the input.
    if let Some(parent) = doc.parent(input) {
        if let Some(node) = doc.select_all(parent, container).into_iter().find(usable) {
            return hit(node, ContainerStrategy::Parent);
        }
    }

    // 3. Within the enclosing chat area.
    if let Some(area) = chat_area(doc, input) {
        if let Some(node) = doc.select_all(area, container).into_iter().find(usable) {
            return hit(node, ContainerStrategy::ChatArea);
        }
    }

    // 4. Whole document, closest to the input.
    if let Some(node) = nearest_match(doc, input, container) {
        return hit(node, ContainerStrategy::Nearest);
    }

    // 5. Whatever sits where a send button usually is.
    hit_test_near(doc, input).and_then(|node| hit(node, ContainerStrategy::HitTest))
}

/// The full cascade. Step 6 appends a new container to the input's parent.
pub fn find_container(
    doc: &mut Document,
    input: NodeId,
    container: &SelectorList,
) -> Result<ContainerHit, DomError> {
    if let Some(found) = find_existing_container(doc, input, container) {
        debug!(
            "Container for input {} found by {} step: {}",
            input,
            found.strategy.name(),
            found.node
        );
        return Ok(found);
    }

    let parent = doc.parent(input).ok_or(DomError::NoParent(input))?;
    let node = doc.create_element("div");
    doc.set_attribute(node, "class", "prompt-assist-container")?;
    doc.set_attribute(node, OWNED_ATTRIBUTE, "container")?;
    doc.append_child(parent, node)?;
    debug!("Synthesized container {} for input {}", node, input);
    Ok(ContainerHit {
        node,
        strategy: ContainerStrategy::Synthesized,
    })
}

/// Region observed while waiting for a real container: the enclosing chat
/// area, or the body.
pub fn watch_scope(doc: &Document, input: NodeId) -> NodeId {
    chat_area(doc, input).unwrap_or_else(|| doc.body())
}

/// Whether the node is, or sits inside, something the overlay created.
pub fn is_owned(doc: &Document, node: NodeId) -> bool {
    std::iter::once(node)
        .chain(doc.ancestors(node))
        .any(|n| doc.has_attribute(n, OWNED_ATTRIBUTE))
}

fn chat_area(doc: &Document, input: NodeId) -> Option<NodeId> {
    let selector = SelectorList::parse(CHAT_AREA_SELECTOR).ok()?;
    doc.ancestors(input)
        .into_iter()
        .find(|&a| doc.matches(a, &selector))
}

fn nearest_match(doc: &Document, input: NodeId, container: &SelectorList) -> Option<NodeId> {
    let candidates: Vec<NodeId> = doc
        .select_all(doc.root(), container)
        .into_iter()
        .filter(|&n| n != input && !is_owned(doc, n))
        .collect();
    let Some(origin) = doc.rect(input) else {
        return candidates.first().copied();
    };

    // Ties and boxless candidates fall back to document order.
    let mut best: Option<(NodeId, f64)> = None;
    for node in candidates {
        let distance = doc
            .rect(node)
            .map(|r| r.center_distance(&origin))
            .unwrap_or(f64::INFINITY);
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((node, distance)),
        }
    }
    best.map(|(node, _)| node)
}

fn hit_test_near(doc: &Document, input: NodeId) -> Option<NodeId> {
    let rect = doc.rect(input)?;
    let (right, bottom) = rect.bottom_right();
    let target = doc.element_from_point(right + HIT_TEST_DX, bottom + HIT_TEST_DY)?;

    std::iter::once(target)
        .chain(doc.ancestors(target))
        .filter(|&n| n != input && n != doc.body() && n != doc.root())
        .filter(|&n| !is_owned(doc, n) && !doc.contains(input, n))
        .find(|&n| {
            doc.class_list(n).iter().any(|class| {
                let class = class.to_ascii_lowercase();
                CONTAINER_KEYWORDS.iter().any(|k| class.contains(k))
            })
        })
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
